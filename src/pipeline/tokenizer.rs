use crate::types::RawRow;

const BOM: char = '\u{feff}';

/// Split raw CSV-like text into rows of cells.
///
/// A `"` toggles quoted mode and is not emitted. Commas and line feeds inside
/// a quoted field are kept as content, so a logical row may span several
/// physical lines. Carriage returns are dropped everywhere. Rows whose cells
/// are all blank are skipped. An unterminated quote at end of input is
/// treated as closed.
pub fn tokenize(text: &str) -> Vec<RawRow> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut rows = Vec::new();
    let mut row: RawRow = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    for ch in text.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '\r' => {}
            ',' if !in_quotes => row.push(std::mem::take(&mut cell)),
            '\n' if !in_quotes => {
                row.push(std::mem::take(&mut cell));
                push_row(&mut rows, std::mem::take(&mut row));
            }
            _ => cell.push(ch),
        }
    }

    if !row.is_empty() || !cell.is_empty() {
        row.push(cell);
        push_row(&mut rows, row);
    }

    rows
}

fn push_row(rows: &mut Vec<RawRow>, row: RawRow) {
    if row.iter().any(|c| !c.trim().is_empty()) {
        rows.push(row);
    }
}

/// Serialize rows back to text, quoting cells that contain a comma or a line feed.
pub fn serialize(rows: &[RawRow]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    if cell.contains([',', '\n']) {
                        format!("\"{}\"", cell)
                    } else {
                        cell.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(row: &[&str]) -> RawRow {
        row.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_rows() {
        let rows = tokenize("a,b,c\nd,e,f\n");
        assert_eq!(rows, vec![cells(&["a", "b", "c"]), cells(&["d", "e", "f"])]);
    }

    #[test]
    fn test_quoted_comma_does_not_split() {
        let rows = tokenize("1,\"מילואים, עצמאי\",x");
        assert_eq!(rows, vec![cells(&["1", "מילואים, עצמאי", "x"])]);
    }

    #[test]
    fn test_quoted_newline_stays_in_one_cell() {
        let rows = tokenize("A,\"line1\nline2\",C");
        assert_eq!(rows, vec![cells(&["A", "line1\nline2", "C"])]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let rows = tokenize("a,b\r\nc,d\r\n");
        assert_eq!(rows, vec![cells(&["a", "b"]), cells(&["c", "d"])]);
    }

    #[test]
    fn test_quoted_crlf_keeps_line_feed_only() {
        let rows = tokenize("\"x\r\ny\",z\r\n");
        assert_eq!(rows, vec![cells(&["x\ny", "z"])]);
    }

    #[test]
    fn test_blank_rows_dropped() {
        let rows = tokenize("a,b\n,,\n   ,  \n\n\"\",\"\"\nc,d");
        assert_eq!(rows, vec![cells(&["a", "b"]), cells(&["c", "d"])]);
    }

    #[test]
    fn test_only_commas_inside_quotes() {
        let rows = tokenize("x,\",,,\",y");
        assert_eq!(rows, vec![cells(&["x", ",,,", "y"])]);
    }

    #[test]
    fn test_unterminated_quote_closes_at_end() {
        let rows = tokenize("a,\"open field\nstill open");
        assert_eq!(rows, vec![cells(&["a", "open field\nstill open"])]);
    }

    #[test]
    fn test_doubled_quotes_toggle_twice() {
        let rows = tokenize("\"תקועים בחו\"\"ל\",b");
        assert_eq!(rows, vec![cells(&["תקועים בחול", "b"])]);
    }

    #[test]
    fn test_bom_is_stripped() {
        let rows = tokenize("\u{feff}Post ID,x");
        assert_eq!(rows[0][0], "Post ID");
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_serialize_then_tokenize_round_trip() {
        let original = tokenize("1,\"a, b\",c\n2,d,\"e,f,g\"\n3,,h");
        let again = tokenize(&serialize(&original));
        assert_eq!(original, again);
    }

    #[test]
    fn test_multiline_cell_round_trip() {
        let original = tokenize("A,\"line1\nline2\",C\n2,\"x, y\nz\",w");
        assert_eq!(original[0], cells(&["A", "line1\nline2", "C"]));
        let serialized = serialize(&original);
        assert_eq!(serialized, "A,\"line1\nline2\",C\n2,\"x, y\nz\",w");
        assert_eq!(tokenize(&serialized), original);
    }

    #[test]
    fn test_whitespace_cells_preserved_untrimmed() {
        let rows = tokenize(" a , b ");
        assert_eq!(rows, vec![cells(&[" a ", " b "])]);
    }
}
