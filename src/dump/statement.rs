/// One executable unit of a SQL dump.
///
/// A dump is an ordered sequence of these; order is load-bearing
/// (inserts depend on prior creates) and is preserved exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A plain SQL command, run over the simple-query protocol.
    Sql(String),
    /// A `COPY ... FROM stdin` command paired with its inline data
    /// block, as emitted by pg_dump's plain format. The data excludes
    /// the `\.` terminator and keeps one trailing newline per row.
    Copy { command: String, data: String },
}

impl Statement {
    /// Split dump text into statements.
    ///
    /// Honors single-quoted literals (with `''` escape), double-quoted
    /// identifiers, `--` line comments, nested `/* */` block comments,
    /// and dollar-quoted bodies. Comments are stripped; statements that
    /// contain only whitespace are dropped. psql meta-commands (lines
    /// starting with `\` between statements) are not SQL and are skipped.
    pub fn split(text: &str) -> Vec<Self> {
        let cs = text.chars().collect::<Vec<_>>();
        let mut out = Vec::new();
        let mut buf = String::new();
        let mut bol = true;
        let mut i = 0;
        while i < cs.len() {
            let c = cs[i];
            let next = cs.get(i + 1).copied();
            if bol && c == '\\' && buf.trim().is_empty() {
                buf.clear();
                while i < cs.len() && cs[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            bol = false;
            match c {
                '-' if next == Some('-') => {
                    while i < cs.len() && cs[i] != '\n' {
                        i += 1;
                    }
                }
                '/' if next == Some('*') => {
                    let mut depth = 1;
                    i += 2;
                    while i < cs.len() && depth > 0 {
                        if cs[i] == '/' && cs.get(i + 1) == Some(&'*') {
                            depth += 1;
                            i += 2;
                        } else if cs[i] == '*' && cs.get(i + 1) == Some(&'/') {
                            depth -= 1;
                            i += 2;
                        } else {
                            i += 1;
                        }
                    }
                }
                '\'' | '"' => {
                    let quote = c;
                    buf.push(quote);
                    i += 1;
                    while i < cs.len() {
                        buf.push(cs[i]);
                        if cs[i] == quote {
                            // doubled quote escapes itself
                            if cs.get(i + 1) == Some(&quote) {
                                buf.push(quote);
                                i += 2;
                                continue;
                            }
                            i += 1;
                            break;
                        }
                        i += 1;
                    }
                }
                '$' => match Self::tag(&cs[i..]) {
                    None => {
                        buf.push(c);
                        i += 1;
                    }
                    Some(tag) => {
                        buf.push_str(&tag);
                        i += tag.chars().count();
                        while i < cs.len() {
                            if cs[i] == '$' && Self::leads(&cs[i..], &tag) {
                                buf.push_str(&tag);
                                i += tag.chars().count();
                                break;
                            }
                            buf.push(cs[i]);
                            i += 1;
                        }
                    }
                },
                ';' => {
                    i += 1;
                    let sql = buf.trim().to_string();
                    buf.clear();
                    bol = true;
                    if sql.is_empty() {
                        continue;
                    }
                    if Self::stdin(&sql) {
                        while i < cs.len() && cs[i] != '\n' {
                            i += 1;
                        }
                        i = cs.len().min(i + 1);
                        let (data, read) = Self::block(&cs[i..]);
                        i += read;
                        out.push(Self::Copy { command: sql, data });
                    } else {
                        out.push(Self::Sql(sql));
                    }
                }
                '\n' => {
                    bol = true;
                    buf.push(c);
                    i += 1;
                }
                _ => {
                    buf.push(c);
                    i += 1;
                }
            }
        }
        let sql = buf.trim().to_string();
        if !sql.is_empty() {
            out.push(Self::Sql(sql));
        }
        out
    }

    /// Short single-line preview for diagnostics.
    pub fn preview(&self) -> String {
        let sql = match self {
            Self::Sql(sql) => sql,
            Self::Copy { command, .. } => command,
        };
        let line = sql.split_whitespace().collect::<Vec<_>>().join(" ");
        match line.char_indices().nth(80) {
            None => line,
            Some((at, _)) => format!("{}...", &line[..at]),
        }
    }

    /// Whether this command expects an inline data block.
    fn stdin(sql: &str) -> bool {
        let upper = sql.to_uppercase();
        upper.starts_with("COPY") && upper.contains("FROM STDIN")
    }

    /// Parse a `$tag$` opener at the head of the slice.
    /// Tags are empty or identifier-like per Postgres lexing.
    fn tag(cs: &[char]) -> Option<String> {
        let mut tag = String::from('$');
        for &c in &cs[1..] {
            match c {
                '$' => {
                    tag.push('$');
                    return Some(tag);
                }
                c if c.is_alphanumeric() || c == '_' => tag.push(c),
                _ => return None,
            }
        }
        None
    }

    /// Whether the slice begins with the given tag.
    fn leads(cs: &[char], tag: &str) -> bool {
        tag.chars().count() <= cs.len() && tag.chars().zip(cs).all(|(a, &b)| a == b)
    }

    /// Consume a COPY data block up to its `\.` terminator line.
    /// Returns the captured data and the number of chars consumed.
    fn block(cs: &[char]) -> (String, usize) {
        let mut data = String::new();
        let mut line = String::new();
        let mut i = 0;
        while i < cs.len() {
            let c = cs[i];
            i += 1;
            if c == '\n' {
                if line == "\\." {
                    return (data, i);
                }
                data.push_str(&line);
                data.push('\n');
                line.clear();
            } else {
                line.push(c);
            }
        }
        if !line.is_empty() && line != "\\." {
            data.push_str(&line);
            data.push('\n');
        }
        (data, i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_statements_in_order() {
        let statements = Statement::split(
            "CREATE TABLE t (id integer);\n\
             INSERT INTO t VALUES (1);\n\
             INSERT INTO t VALUES (2);",
        );
        assert_eq!(
            statements,
            vec![
                Statement::Sql("CREATE TABLE t (id integer)".into()),
                Statement::Sql("INSERT INTO t VALUES (1)".into()),
                Statement::Sql("INSERT INTO t VALUES (2)".into()),
            ]
        );
    }

    #[test]
    fn keeps_semicolons_inside_literals() {
        let statements = Statement::split("INSERT INTO t VALUES ('a;b');");
        assert_eq!(
            statements,
            vec![Statement::Sql("INSERT INTO t VALUES ('a;b')".into())]
        );
    }

    #[test]
    fn keeps_doubled_quote_escapes() {
        let statements = Statement::split("INSERT INTO t VALUES ('it''s; fine');");
        assert_eq!(
            statements,
            vec![Statement::Sql("INSERT INTO t VALUES ('it''s; fine')".into())]
        );
    }

    #[test]
    fn keeps_quoted_identifiers() {
        let statements = Statement::split("SELECT \"weird;name\" FROM t;");
        assert_eq!(
            statements,
            vec![Statement::Sql("SELECT \"weird;name\" FROM t".into())]
        );
    }

    #[test]
    fn strips_line_comments() {
        let statements = Statement::split(
            "-- a comment; with a semicolon\n\
             SELECT 1; -- trailing\n\
             SELECT 2;",
        );
        assert_eq!(
            statements,
            vec![
                Statement::Sql("SELECT 1".into()),
                Statement::Sql("SELECT 2".into()),
            ]
        );
    }

    #[test]
    fn strips_nested_block_comments() {
        let statements = Statement::split("SELECT /* outer /* inner; */ still; */ 1;");
        assert_eq!(statements, vec![Statement::Sql("SELECT  1".into())]);
    }

    #[test]
    fn keeps_dollar_quoted_bodies() {
        let sql = "CREATE FUNCTION f() RETURNS void AS $fn$ BEGIN SELECT 1; END; $fn$ LANGUAGE plpgsql";
        let statements = Statement::split(&format!("{};", sql));
        assert_eq!(statements, vec![Statement::Sql(sql.into())]);
    }

    #[test]
    fn dollar_parameters_are_not_quotes() {
        let statements = Statement::split("SELECT $1 + $2;");
        assert_eq!(statements, vec![Statement::Sql("SELECT $1 + $2".into())]);
    }

    #[test]
    fn captures_copy_data_block() {
        let statements = Statement::split(
            "COPY t (id, name) FROM stdin;\n\
             1\tbulbasaur\n\
             2\tivysaur\n\
             \\.\n\
             SELECT 1;",
        );
        assert_eq!(
            statements,
            vec![
                Statement::Copy {
                    command: "COPY t (id, name) FROM stdin".into(),
                    data: "1\tbulbasaur\n2\tivysaur\n".into(),
                },
                Statement::Sql("SELECT 1".into()),
            ]
        );
    }

    #[test]
    fn captures_empty_copy_data_block() {
        let statements = Statement::split("COPY t (id) FROM stdin;\n\\.\n");
        assert_eq!(
            statements,
            vec![Statement::Copy {
                command: "COPY t (id) FROM stdin".into(),
                data: String::new(),
            }]
        );
    }

    #[test]
    fn skips_meta_commands() {
        let statements = Statement::split(
            "\\connect pokemon\n\
             SELECT 1;\n\
             \\unrestrict\n\
             SELECT 2;",
        );
        assert_eq!(
            statements,
            vec![
                Statement::Sql("SELECT 1".into()),
                Statement::Sql("SELECT 2".into()),
            ]
        );
    }

    #[test]
    fn drops_empty_statements() {
        let statements = Statement::split(";;\n   ;\n-- nothing\n;");
        assert!(statements.is_empty());
    }

    #[test]
    fn keeps_unterminated_trailing_statement() {
        let statements = Statement::split("SELECT 1;\nSELECT 2");
        assert_eq!(
            statements,
            vec![
                Statement::Sql("SELECT 1".into()),
                Statement::Sql("SELECT 2".into()),
            ]
        );
    }

    #[test]
    fn previews_collapse_whitespace() {
        let statement = Statement::Sql("ALTER TABLE\n  pokemon\n  OWNER TO admin".into());
        assert_eq!(statement.preview(), "ALTER TABLE pokemon OWNER TO admin");
    }
}
