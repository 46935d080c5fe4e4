use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// What a key did to a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Continue,
    Submit,
    Cancel,
    /// The form had no use for the key; the caller may.
    Unhandled(KeyEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldKind {
    Text,
    Secret,
    Choice { options: Vec<String>, selected: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormField<K> {
    key: K,
    label: String,
    kind: FieldKind,
    value: String,
}

impl<K> FormField<K> {
    fn is_typed(&self) -> bool {
        matches!(self.kind, FieldKind::Text | FieldKind::Secret)
    }
}

/// A vertical list of labelled inputs with one focused field.
///
/// Text fields take typed characters; choice fields cycle with Left/Right.
/// Tab/Down and BackTab/Up move focus, Enter submits, Esc cancels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form<K> {
    title: String,
    fields: Vec<FormField<K>>,
    focus: usize,
    error: Option<String>,
}

impl<K: Copy + PartialEq> Form<K> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            focus: 0,
            error: None,
        }
    }

    pub fn text(mut self, key: K, label: &str, value: impl Into<String>) -> Self {
        self.push(key, label, FieldKind::Text, value.into());
        self
    }

    pub fn secret(mut self, key: K, label: &str) -> Self {
        self.push(key, label, FieldKind::Secret, String::new());
        self
    }

    pub fn choice(mut self, key: K, label: &str, options: Vec<String>, selected: usize) -> Self {
        let selected = selected.min(options.len().saturating_sub(1));
        self.push(key, label, FieldKind::Choice { options, selected }, String::new());
        self
    }

    fn push(&mut self, key: K, label: &str, kind: FieldKind, value: String) {
        self.fields.push(FormField {
            key,
            label: label.to_string(),
            kind,
            value,
        });
    }

    fn field(&self, key: K) -> Option<&FormField<K>> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn field_mut(&mut self, key: K) -> Option<&mut FormField<K>> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    pub fn has(&self, key: K) -> bool {
        self.field(key).is_some()
    }

    /// Typed text of a text or secret field; empty for choices and absent keys.
    pub fn value(&self, key: K) -> &str {
        self.field(key).map(|f| f.value.as_str()).unwrap_or_default()
    }

    pub fn set_value(&mut self, key: K, value: impl Into<String>) {
        if let Some(field) = self.field_mut(key) {
            field.value = value.into();
        }
    }

    pub fn selected(&self, key: K) -> Option<usize> {
        match self.field(key).map(|f| &f.kind) {
            Some(FieldKind::Choice { selected, .. }) => Some(*selected),
            _ => None,
        }
    }

    /// Replace a choice field's options and selection.
    pub fn set_options(&mut self, key: K, new_options: Vec<String>, new_selected: usize) {
        if let Some(field) = self.field_mut(key) {
            let selected = new_selected.min(new_options.len().saturating_sub(1));
            field.kind = FieldKind::Choice {
                options: new_options,
                selected,
            };
        }
    }

    pub fn focused(&self) -> Option<K> {
        self.fields.get(self.focus).map(|f| f.key)
    }

    pub fn focus(&mut self, key: K) {
        if let Some(idx) = self.fields.iter().position(|f| f.key == key) {
            self.focus = idx;
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        let typed = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Esc => FormEvent::Cancel,
            KeyCode::Enter => FormEvent::Submit,
            KeyCode::Tab | KeyCode::Down => {
                if !self.fields.is_empty() {
                    self.focus = (self.focus + 1) % self.fields.len();
                }
                FormEvent::Continue
            }
            KeyCode::BackTab | KeyCode::Up => {
                if !self.fields.is_empty() {
                    self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
                }
                FormEvent::Continue
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match self.fields.get_mut(self.focus).map(|f| &mut f.kind) {
                    Some(FieldKind::Choice { options, selected }) if !options.is_empty() => {
                        *selected = if forward {
                            (*selected + 1) % options.len()
                        } else {
                            (*selected + options.len() - 1) % options.len()
                        };
                        FormEvent::Continue
                    }
                    _ => FormEvent::Unhandled(key),
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    if field.is_typed() {
                        field.value.pop();
                    }
                }
                FormEvent::Continue
            }
            KeyCode::Char(c) if typed => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    if field.is_typed() {
                        field.value.push(c);
                    }
                }
                FormEvent::Continue
            }
            _ => FormEvent::Unhandled(key),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let label_width = self.fields.iter().map(|f| f.label.len()).max().unwrap_or(0);
        let mut lines: Vec<Line> = Vec::new();
        for (i, field) in self.fields.iter().enumerate() {
            let focused = i == self.focus;
            let marker = if focused { "> " } else { "  " };
            let label_style = if focused {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().bold()
            };
            let shown = match &field.kind {
                FieldKind::Text if focused => format!("{}_", field.value),
                FieldKind::Text => field.value.clone(),
                FieldKind::Secret => "*".repeat(field.value.chars().count()),
                FieldKind::Choice { options, selected } => format!(
                    "< {} >",
                    options.get(*selected).map(String::as_str).unwrap_or("-")
                ),
            };
            lines.push(Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<label_width$}  ", field.label), label_style),
                Span::raw(shown),
            ]));
        }

        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum F {
        Name,
        Pin,
        Color,
    }

    fn form() -> Form<F> {
        Form::new("Test")
            .text(F::Name, "Name", "ab")
            .secret(F::Pin, "Pin")
            .choice(F::Color, "Color", vec!["red".into(), "blue".into()], 0)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_edits_the_focused_field() {
        let mut f = form();
        f.handle_key(key(KeyCode::Char('c')));
        f.handle_key(key(KeyCode::Backspace));
        f.handle_key(key(KeyCode::Backspace));
        assert_eq!(f.value(F::Name), "a");

        f.handle_key(key(KeyCode::Tab));
        f.handle_key(key(KeyCode::Char('4')));
        assert_eq!(f.value(F::Pin), "4");
        assert_eq!(f.value(F::Name), "a");
    }

    #[test]
    fn choices_cycle_both_ways() {
        let mut f = form();
        f.focus(F::Color);
        f.handle_key(key(KeyCode::Right));
        assert_eq!(f.selected(F::Color), Some(1));
        f.handle_key(key(KeyCode::Right));
        assert_eq!(f.selected(F::Color), Some(0));
        f.handle_key(key(KeyCode::Left));
        assert_eq!(f.selected(F::Color), Some(1));
        // characters do not leak into a choice
        f.handle_key(key(KeyCode::Char('x')));
        assert_eq!(f.value(F::Color), "");
    }

    #[test]
    fn focus_wraps() {
        let mut f = form();
        f.handle_key(key(KeyCode::Up));
        assert_eq!(f.focused(), Some(F::Color));
        f.handle_key(key(KeyCode::Down));
        assert_eq!(f.focused(), Some(F::Name));
    }

    #[test]
    fn control_chords_are_left_to_the_caller() {
        let mut f = form();
        let chord = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(f.handle_key(chord), FormEvent::Unhandled(chord));
        assert_eq!(f.value(F::Name), "ab");
        assert_eq!(f.handle_key(key(KeyCode::Enter)), FormEvent::Submit);
        assert_eq!(f.handle_key(key(KeyCode::Esc)), FormEvent::Cancel);
    }

    #[test]
    fn set_options_clamps_selection() {
        let mut f = form();
        f.set_options(F::Color, vec!["green".into()], 5);
        assert_eq!(f.selected(F::Color), Some(0));
    }
}
