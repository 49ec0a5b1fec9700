//! Place-chain expansion for schedule titles.
//!
//! Filenames carry place names as lowercase hyphen-chained tokens with
//! abbreviated prepositions, e.g. `st-veit-a-d-glan`. Expansion rules consume
//! 2-3 tokens atomically, greedily left to right, before falling through to
//! plain capitalization.

/// Expand a place chain into title tokens and join them with an em-dash.
pub(crate) fn build_title(places: &str) -> String {
    expand_places(places).join(" \u{2014} ")
}

/// Expand the hyphen-separated place chain into display tokens.
pub fn expand_places(places: &str) -> Vec<String> {
    let tokens: Vec<&str> = places.split('-').filter(|t| !t.is_empty()).collect();
    let mut out: Vec<String> = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].to_lowercase();
        match token.as_str() {
            // st-veit -> St.Veit
            "st" if i + 1 < tokens.len() => {
                out.push(format!("St.{}", capitalize(tokens[i + 1])));
                i += 2;
            }
            // a-d-glan -> an der Glan
            "a" if i + 2 < tokens.len() && tokens[i + 1].eq_ignore_ascii_case("d") => {
                out.push(format!("an der {}", capitalize(tokens[i + 2])));
                i += 3;
            }
            // o-d-enns -> ob der Enns
            "o" if i + 2 < tokens.len() && tokens[i + 1].eq_ignore_ascii_case("d") => {
                out.push(format!("ob der {}", capitalize(tokens[i + 2])));
                i += 3;
            }
            // wolfsberg-am-see -> Wolfsberg am See (merged into the previous place)
            "am" if i + 1 < tokens.len() => {
                let place = capitalize(tokens[i + 1]);
                match out.last_mut() {
                    Some(prev) => {
                        prev.push_str(" am ");
                        prev.push_str(&place);
                    }
                    None => out.push(format!("am {}", place)),
                }
                i += 2;
            }
            _ => {
                out.push(capitalize(tokens[i]));
                i += 1;
            }
        }
    }

    out
}

/// Uppercase the first character, lowercase the rest. Unicode-aware, so
/// umlauts survive (ä -> Ä, not A).
pub(crate) fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn st_and_an_der_expansion() {
        // st-veit-a-d-glan -> exactly two output tokens
        assert_eq!(
            expand_places("st-veit-a-d-glan"),
            vec!["St.Veit".to_string(), "an der Glan".to_string()]
        );
    }

    #[test]
    fn ob_der_expansion() {
        assert_eq!(expand_places("haus-o-d-enns"), vec!["Haus", "ob der Enns"]);
    }

    #[test]
    fn am_merges_into_previous_place() {
        assert_eq!(expand_places("wolfsberg-am-see"), vec!["Wolfsberg am See"]);
    }

    #[test]
    fn plain_chain_is_capitalized_and_joined() {
        assert_eq!(build_title("villach-klagenfurt"), "Villach \u{2014} Klagenfurt");
    }

    #[test]
    fn umlauts_are_preserved() {
        assert_eq!(capitalize("pörtschach"), "Pörtschach");
        assert_eq!(capitalize("össiach"), "Össiach");
    }

    #[test]
    fn dangling_abbreviation_falls_through_to_default() {
        // "st" with nothing after it is just capitalized
        assert_eq!(expand_places("villach-st"), vec!["Villach", "St"]);
        // "a-d" without a trailing place
        assert_eq!(expand_places("graz-a-d"), vec!["Graz", "A", "D"]);
    }
}
