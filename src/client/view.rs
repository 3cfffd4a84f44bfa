//! The view seam between the sync loop and whatever renders it.

use async_trait::async_trait;

use crate::store::TodoFields;

/// Current contents of the view's input fields.
///
/// Values are passed to the store as typed; validation is the store's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub id: String,
    pub label: String,
    pub name: String,
    pub description: String,
    pub date: String,
    pub importance: String,
}

impl FormValues {
    /// The mutable record fields. An empty label is left unset.
    pub fn to_fields(&self) -> TodoFields {
        TodoFields::new(
            self.name.as_str(),
            self.description.as_str(),
            self.date.as_str(),
            self.importance.as_str(),
        )
        .with_label(self.label.as_str())
    }

    /// Reset every input to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A user event raised by the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Add(FormValues),
    Update(FormValues),
    Delete(FormValues),
    /// The window was closed or the user chose to exit.
    Closed,
}

/// A surface that displays the record text and raises button events.
#[async_trait]
pub trait TodoView: Send {
    /// Block until the next user event.
    async fn read_event(&mut self) -> crate::error::Result<ViewEvent>;

    /// Replace the displayed record text.
    async fn show_records(&mut self, text: &str) -> crate::error::Result<()>;

    /// Empty every input field.
    async fn clear_inputs(&mut self) -> crate::error::Result<()>;

    /// Tell the user a call did not go through.
    async fn show_error(&mut self, message: &str) -> crate::error::Result<()>;

    /// Release the view. Called once, after [`ViewEvent::Closed`].
    async fn close(&mut self) -> crate::error::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_label_is_not_sent() {
        let form = FormValues {
            name: "n".to_owned(),
            description: "d".to_owned(),
            date: "x".to_owned(),
            importance: "1".to_owned(),
            ..FormValues::default()
        };
        assert!(form.to_fields().label.is_none());
    }

    #[test]
    fn clear_resets_all_inputs() {
        let mut form = FormValues {
            id: "3".to_owned(),
            label: "l".to_owned(),
            name: "n".to_owned(),
            ..FormValues::default()
        };
        form.clear();
        assert_eq!(form, FormValues::default());
    }
}
