/// A user gesture reported by a presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Submit a search term; blank means every record.
    Search(String),
    /// Browse the whole collection.
    ShowAll,
    /// Open the detail view of one code.
    Select(String),
    /// Return from the detail view to the last result list.
    Back,
    /// Dismiss the panel.
    Close,
}

impl Action {
    /// Parse one line of browser input.
    ///
    /// `:open <codigo>` / `:o`, `:back` / `:b`, `:all` / `:a`, `:close` / `:c`;
    /// anything else is a search term.
    pub fn parse(line: &str) -> Action {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return Action::Search(line.to_string());
        };
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        match name {
            "open" | "o" => Action::Select(arg.to_string()),
            "back" | "b" => Action::Back,
            "all" | "a" => Action::ShowAll,
            "close" | "c" => Action::Close,
            _ => Action::Search(line.to_string()),
        }
    }
}
