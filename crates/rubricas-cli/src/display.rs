//! Terminal rendering of result lists and rubrica detail cards.
//!
//! The detail card is grouped into sections that are only printed when at
//! least one of their fields is present.

use std::io::Write;
use std::sync::Mutex;

use rubricas_core::{CatalogError, Repercussion, Rubrica, TaxCategory};
use rubricas_nav::{ListPage, Presenter};

const LABEL_WIDTH: usize = 18;
const MAX_DESCRICAO: usize = 90;

/// A [`Presenter`] writing plain text to any writer.
pub struct TerminalPresenter<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        // A closed terminal leaves nothing to report to.
        let _ = out.write_all(text.as_bytes()).and_then(|_| out.flush());
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn render_list(&self, page: &ListPage<'_>) {
        self.write(&format_list(page));
    }

    fn render_detail(&self, record: &Rubrica, term: &str) {
        self.write(&format_card(record, term));
    }

    fn notify_failure(&self, error: &CatalogError) {
        self.write(&format!("! {}\n\n", failure_message(error)));
    }

    fn show(&self) {}

    fn hide(&self) {
        self.write("(painel fechado)\n\n");
    }
}

// ── Result list ──

pub fn format_list(page: &ListPage<'_>) -> String {
    let mut s = String::from("== Resultados da Busca ==\n");

    let heading = if page.is_all_records() {
        "Exibindo todas as rubricas".to_string()
    } else {
        format!("Termo buscado: \"{}\"", page.term())
    };
    if page.is_empty() {
        s.push_str(&format!("{heading}\n\nNenhum resultado encontrado.\n\n"));
        return s;
    }
    s.push_str(&format!("{heading}  [{} resultados]\n\n", page.total()));

    if page.is_large() {
        s.push_str(&format!(
            "Mostrando {} rubricas. Use a busca para filtrar resultados específicos.\n\n",
            page.total()
        ));
    }

    for r in page.shown() {
        let codigo = r.codigo().unwrap_or("-");
        s.push_str(&format!("  {:<8} {}\n", codigo, r.nome().unwrap_or("")));
        if let Some(descricao) = r.descricao() {
            s.push_str(&format!("  {:<8} {}\n", "", shorten(descricao, MAX_DESCRICAO)));
        }
    }

    if page.is_truncated() {
        s.push_str(&format!(
            "\nExibindo apenas os primeiros {} resultados de {}. Use a busca para refinar sua consulta.\n",
            page.shown().len(),
            page.total()
        ));
    }
    s.push_str("\n:open <código> para detalhes\n\n");
    s
}

// ── Detail card ──

pub fn format_card(record: &Rubrica, term: &str) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "=== {} ===\nCódigo: {}\n",
        record.nome().unwrap_or("Nome não disponível"),
        record.codigo().unwrap_or("Código não disponível")
    ));
    s.push_str(&format!(
        "{}\n\n",
        record.descricao().unwrap_or("Descrição não disponível")
    ));

    if let Some(tipo) = record.tipo() {
        s.push_str(&format!("  {:<LABEL_WIDTH$} {}\n\n", "Tipo", tipo));
    }

    for category in TaxCategory::ALL {
        let incidence = record.incidence(category);
        if incidence.is_empty() {
            continue;
        }
        s.push_str(category.label());
        s.push('\n');
        for (label, value) in [
            ("Incidência", incidence.incidencia),
            ("Classificação", incidence.classificacao),
            ("Base legal", incidence.baselegal),
        ] {
            if let Some(value) = value {
                s.push_str(&format!("  {label:<LABEL_WIDTH$} {value}\n"));
            }
        }
        s.push('\n');
    }

    s.push_str(&format_repercussions(record));

    if !record.extra.is_empty() {
        s.push_str("Outros\n");
        for (key, value) in &record.extra {
            let value = match value {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            s.push_str(&format!("  {key:<LABEL_WIDTH$} {value}\n"));
        }
        s.push('\n');
    }

    s.push_str(&format!(":back para voltar a \"{term}\"\n\n"));
    s
}

fn format_repercussions(record: &Rubrica) -> String {
    let labels = |wanted: bool| -> Vec<&'static str> {
        Repercussion::ALL
            .into_iter()
            .filter(|flag| record.repercussion(*flag) == Some(wanted))
            .map(|flag| flag.label())
            .collect()
    };
    let applies = labels(true);
    let not_applies = labels(false);
    if applies.is_empty() && not_applies.is_empty() {
        return String::new();
    }

    let mut s = String::from("Repercute em\n");
    if !applies.is_empty() {
        s.push_str(&format!("  {:<LABEL_WIDTH$} {}\n", "+ Incide", applies.join(", ")));
    }
    if !not_applies.is_empty() {
        s.push_str(&format!(
            "  {:<LABEL_WIDTH$} {}\n",
            "- Não incide",
            not_applies.join(", ")
        ));
    }
    s.push('\n');
    s
}

fn failure_message(error: &CatalogError) -> String {
    match error {
        CatalogError::NotFound(what) => format!("Não encontrado: {what}"),
        CatalogError::Transport(detail) => format!("Falha ao acessar os dados: {detail}"),
        CatalogError::MalformedData(detail) => format!("Dados inválidos: {detail}"),
        CatalogError::InvalidArgument(detail) => format!("Requisição inválida: {detail}"),
    }
}

fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
