use std::path::Path;

use citeweave_core::Statement;

use crate::{ReportError, read_input, write_output};

/// Header row of every statement file.
pub const STATEMENT_HEADER: &str = "Filename\tSentence";

/// Write statements as tab-separated `Filename\tSentence` rows.
///
/// Tabs and line breaks inside a field are replaced by spaces so every
/// statement stays on one row.
pub fn write_statements(path: &Path, statements: &[Statement]) -> Result<(), ReportError> {
    let flatten = |s: &str| s.replace(['\t', '\n', '\r'], " ");
    let mut out = String::from(STATEMENT_HEADER);
    out.push('\n');
    for statement in statements {
        out.push_str(&flatten(&statement.document));
        out.push('\t');
        out.push_str(&flatten(&statement.text));
        out.push('\n');
    }
    write_output(path, &out)
}

/// Read a statement file written by [`write_statements`].
///
/// A missing file is [`ReportError::MissingInput`]; a header-only or empty
/// file yields no statements.
pub fn read_statements(path: &Path) -> Result<Vec<Statement>, ReportError> {
    let content = read_input(path)?;
    let mut lines = content.lines().enumerate();

    match lines.next() {
        None => return Ok(Vec::new()),
        Some((_, header)) if header.trim_end() == STATEMENT_HEADER => {}
        Some(_) => {
            return Err(ReportError::Malformed {
                path: path.to_path_buf(),
                line: 1,
                message: format!("expected header `{}`", STATEMENT_HEADER.replace('\t', "\\t")),
            });
        }
    }

    let mut statements = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let (document, text) = line.split_once('\t').ok_or_else(|| ReportError::Malformed {
            path: path.to_path_buf(),
            line: idx + 1,
            message: "expected two tab-separated fields".to_string(),
        })?;
        statements.push(Statement::new(document, text));
    }
    Ok(statements)
}
