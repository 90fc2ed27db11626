//! Atom tokenizer
//!
//! Splits a status detail or record line into whitespace-separated atoms.
//! A double-quoted segment is one atom with the quotes stripped; inside it a
//! backslash takes the next character literally. An unterminated quote runs
//! to the end of the line. Unquoted atoms end at whitespace or at a `"`.

/// Split a line into atoms
///
/// `wn "this word" end` becomes `["wn", "this word", "end"]`, and
/// `"say \"hi\""` becomes `say "hi"`, so `quote_atom` output splits back to
/// the original parameter.
pub fn split_atoms(line: &str) -> Vec<String> {
    let mut atoms = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let Some(&first) = chars.peek() else {
            break;
        };

        let mut atom = String::new();
        if first == '"' {
            chars.next();
            while let Some(c) = chars.next() {
                match c {
                    '"' => break,
                    '\\' => {
                        // A trailing backslash stands for itself
                        atom.push(chars.next().unwrap_or('\\'));
                    }
                    _ => atom.push(c),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace() && *c != '"') {
                atom.push(c);
            }
        }
        atoms.push(atom);
    }

    atoms
}

/// Render a command parameter as a single atom
///
/// Parameters that are empty or contain whitespace or quotes are wrapped in
/// double quotes, with embedded quotes and backslashes escaped.
pub fn quote_atom(param: &str) -> String {
    let needs_quotes = param.is_empty()
        || param
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'' || c == '\\');

    if !needs_quotes {
        return param.to_string();
    }

    let mut quoted = String::with_capacity(param.len() + 2);
    quoted.push('"');
    for c in param.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
