use crate::form::BookForm;
use crate::model::{Book, BookId};

/// Which modal is open. A single value, so two modals can never be open at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Creating(BookForm),
    Editing {
        id: BookId,
        form: BookForm,
    },
    Deleting(BookId),
}

impl ModalState {
    pub fn creating() -> Self {
        ModalState::Creating(BookForm::blank())
    }

    pub fn editing(book: &Book) -> Self {
        ModalState::Editing {
            id: book.id,
            form: BookForm::from_book(book),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }

    pub fn form(&self) -> Option<&BookForm> {
        match self {
            ModalState::Creating(form) | ModalState::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut BookForm> {
        match self {
            ModalState::Creating(form) | ModalState::Editing { form, .. } => Some(form),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormField;

    fn dune() -> Book {
        Book {
            id: 7,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            genre: "Sci-Fi".to_string(),
            description: "Desert planet".to_string(),
            published_date: "1965-08-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn closed_by_default() {
        let modal = ModalState::default();
        assert!(!modal.is_open());
        assert_eq!(modal.form(), None);
    }

    #[test]
    fn editing_targets_the_book_and_exposes_its_form() {
        let mut modal = ModalState::editing(&dune());
        assert!(matches!(modal, ModalState::Editing { id: 7, .. }));

        modal
            .form_mut()
            .unwrap()
            .set(FormField::Title, "Dune Messiah");
        assert_eq!(modal.form().unwrap().get(FormField::Title), "Dune Messiah");
    }

    #[test]
    fn delete_modal_has_no_form() {
        let mut modal = ModalState::Deleting(3);
        assert!(modal.is_open());
        assert!(modal.form_mut().is_none());
    }

    #[test]
    fn create_modal_starts_blank() {
        let modal = ModalState::creating();
        assert_eq!(modal.form(), Some(&BookForm::blank()));
    }
}
