//! Case-insensitive substring search over the rubrica collection.
//!
//! A record matches when the lowercased, trimmed term occurs in its
//! `codigo`, `nome` or `descricao`. Absent fields never match. Results keep
//! collection order; there is no ranking.

use tracing::debug;

use crate::Rubrica;

/// Filter `collection` by `term`.
///
/// A blank term returns the whole collection in its original order.
pub fn search(term: &str, collection: &[Rubrica]) -> Vec<Rubrica> {
    let term = term.trim();
    if term.is_empty() {
        return collection.to_vec();
    }

    let needle = term.to_lowercase();
    let results: Vec<Rubrica> = collection
        .iter()
        .filter(|r| matches(&needle, r))
        .cloned()
        .collect();
    debug!(term, count = results.len(), "search finished");
    results
}

/// Whether `record` matches an already-lowercased, non-empty `needle`.
pub fn matches(needle: &str, record: &Rubrica) -> bool {
    [record.codigo(), record.nome(), record.descricao()]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rubrica(codigo: &str, nome: &str, descricao: &str) -> Rubrica {
        Rubrica {
            codigo: codigo.into(),
            nome: Some(nome.into()),
            descricao: Some(descricao.into()),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Rubrica> {
        vec![
            rubrica("001", "Salário Base", "Pagamento mensal"),
            rubrica("002", "Hora Extra", "Adicional por hora"),
        ]
    }

    fn codes(results: &[Rubrica]) -> Vec<&str> {
        results.iter().map(|r| r.codigo.as_str()).collect()
    }

    #[test]
    fn term_matches_name_case_insensitively() {
        let results = search("hora", &sample());
        assert_eq!(codes(&results), ["002"]);
    }

    #[test]
    fn empty_term_returns_everything_in_order() {
        let c = sample();
        assert_eq!(search("", &c), c);
        assert_eq!(search("   \t", &c), c);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        assert!(search("XYZ", &sample()).is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let c = sample();
        for term in ["hora", "  hora", "hora  ", "\thora\n"] {
            assert_eq!(search(term, &c), search(term.trim(), &c));
        }
    }

    #[test]
    fn matches_code_and_description() {
        let c = sample();
        assert_eq!(codes(&search("001", &c)), ["001"]);
        assert_eq!(codes(&search("MENSAL", &c)), ["001"]);
        assert_eq!(codes(&search("00", &c)), ["001", "002"]);
    }

    #[test]
    fn matches_accented_text() {
        let c = sample();
        assert_eq!(codes(&search("SALÁRIO", &c)), ["001"]);
    }

    #[test]
    fn absent_fields_are_skipped() {
        let c = vec![
            Rubrica {
                codigo: "010".into(),
                ..Default::default()
            },
            rubrica("011", "Adicional Noturno", "Trabalho noturno"),
        ];
        assert_eq!(codes(&search("noturno", &c)), ["011"]);
        assert_eq!(codes(&search("010", &c)), ["010"]);
    }

    #[test]
    fn results_preserve_collection_order() {
        let c = vec![
            rubrica("300", "Adicional C", "x"),
            rubrica("100", "Adicional A", "x"),
            rubrica("200", "Outro", "sem"),
            rubrica("050", "Adicional B", "x"),
        ];
        assert_eq!(codes(&search("adicional", &c)), ["300", "100", "050"]);
    }

    #[test]
    fn every_field_substring_is_found() {
        let c = sample();
        for r in &c {
            for field in [r.codigo(), r.nome(), r.descricao()].into_iter().flatten() {
                let mid = field.chars().skip(1).take(3).collect::<String>();
                assert!(search(&mid, &c).contains(r), "{mid:?} should find {}", r.codigo);
            }
        }
    }

    #[test]
    fn empty_collection_yields_empty() {
        assert!(search("hora", &[]).is_empty());
        assert!(search("", &[]).is_empty());
    }
}
