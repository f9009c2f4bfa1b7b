use crate::api::{Item, ItemDraft, ItemService};
use crate::tui::widgets::{FieldForm, FormField};

const TITLE_MAX: usize = 120;
const DESCRIPTION_MAX: usize = 500;

pub(super) const DELETE_CONFIRMATION: &str = "delete";

/// What the backend calls an item's title and description
pub(super) struct Labels {
    title: String,
    description: String,
}

impl Labels {
    pub(super) fn from_service(service: &dyn ItemService) -> Self {
        let (title, description) = service.field_labels();
        Self {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

pub(super) fn new_item(noun: &str, labels: &Labels) -> FieldForm {
    FieldForm::new(format!("New {}", noun))
        .field(FormField::new(labels.title.as_str()).required().max_length(TITLE_MAX))
        .field(FormField::new(labels.description.as_str()).max_length(DESCRIPTION_MAX))
}

pub(super) fn modify(item: &Item, labels: &Labels) -> FieldForm {
    FieldForm::new(format!("Modify '{}'", item.title))
        .field(
            FormField::new(labels.title.as_str())
                .required()
                .max_length(TITLE_MAX)
                .value(item.title.clone()),
        )
        .field(
            FormField::new(labels.description.as_str())
                .max_length(DESCRIPTION_MAX)
                .value(item.description.clone()),
        )
}

pub(super) fn rename(item: &Item, labels: &Labels) -> FieldForm {
    FieldForm::new(format!("Rename '{}'", item.title)).field(
        FormField::new(format!("New {}", labels.title.to_lowercase()))
            .required()
            .max_length(TITLE_MAX)
            .value(item.title.clone()),
    )
}

pub(super) fn delete(item: &Item) -> FieldForm {
    FieldForm::new(format!("Delete '{}'", item.title))
        .field(
            FormField::new("Confirm")
                .required()
                .placeholder(format!("type {} to confirm", DELETE_CONFIRMATION)),
        )
        .validator(|form| {
            if form.value(0).eq_ignore_ascii_case(DELETE_CONFIRMATION) {
                Ok(())
            } else {
                Err(format!("Type '{}' to confirm", DELETE_CONFIRMATION))
            }
        })
}

/// Title and description of a submitted new/modify form
pub(super) fn draft(form: &FieldForm) -> ItemDraft {
    ItemDraft::new(form.value(0), form.value(1))
}
