//! Form page: turns a `FormView` snapshot into field widgets.

use askama::Template;

use crate::form::validation::is_required;
use crate::form::{Field, FieldKind, FormView, Preview};

/// Field groups in display order
const GROUPS: [(&str, &[Field]); 4] = [
    ("Lokalizacja", &[Field::City, Field::District, Field::Location]),
    (
        "Mieszkanie",
        &[
            Field::Area,
            Field::Rooms,
            Field::Floor,
            Field::FloorsInBuilding,
            Field::Rent,
        ],
    ),
    (
        "Szczegóły",
        &[
            Field::Heating,
            Field::State,
            Field::Market,
            Field::Ownership,
            Field::AdType,
            Field::Available,
        ],
    ),
    (
        "Udogodnienia",
        &[
            Field::Balcony,
            Field::SeparateKitchen,
            Field::Garage,
            Field::Elevator,
            Field::Basement,
        ],
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub name: &'static str,
    pub label: &'static str,
    /// `text`, `number`, `checkbox` or `select`
    pub input: &'static str,
    pub value: String,
    pub checked: bool,
    pub options: Vec<OptionItem>,
    pub message: String,
    pub required: bool,
    pub unit: &'static str,
    /// Changing this input reloads the dependent options
    pub refresh: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub title: &'static str,
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Clone, Template)]
#[template(path = "form.html")]
pub struct FormPage {
    pub groups: Vec<Group>,
    pub previews: Vec<Preview>,
    pub photos_label: &'static str,
    pub photos_message: String,
    pub alert: String,
    pub alert_links_results: bool,
    pub processing: bool,
    pub draft_note: String,
}

impl FormPage {
    pub fn new(view: &FormView) -> Self {
        let groups = GROUPS
            .iter()
            .map(|&(title, fields)| Group {
                title,
                widgets: fields.iter().map(|f| widget(*f, view)).collect(),
            })
            .collect();

        Self {
            groups,
            previews: view.previews.clone(),
            photos_label: Field::Photos.label(),
            photos_message: view.messages.get(&Field::Photos).cloned().unwrap_or_default(),
            alert: view
                .alert
                .as_ref()
                .map(|a| a.message.clone())
                .unwrap_or_default(),
            alert_links_results: view.alert.as_ref().is_some_and(|a| a.results_available),
            processing: view.processing,
            draft_note: view
                .draft_saved_at
                .map(|at| {
                    format!(
                        "Przywrócono dane z wyceny z {}",
                        at.format("%Y-%m-%d %H:%M UTC")
                    )
                })
                .unwrap_or_default(),
        }
    }
}

fn widget(field: Field, view: &FormView) -> Widget {
    let record = &view.record;
    let value = view
        .raw_inputs
        .get(&field)
        .cloned()
        .unwrap_or_else(|| field.display(record));

    let location_options = match field {
        Field::City => Some(&view.cities),
        Field::District => Some(&view.districts),
        _ => None,
    };

    let (input, options) = match (field.kind(), location_options) {
        (FieldKind::Text, Some(names)) if !names.is_empty() => (
            "select",
            names
                .iter()
                .map(|name| OptionItem {
                    value: name.clone(),
                    label: name.clone(),
                    selected: *name == value,
                })
                .collect(),
        ),
        (FieldKind::Select, _) => (
            "select",
            field
                .options()
                .into_iter()
                .map(|(code, label)| OptionItem {
                    value: code.to_string(),
                    label: label.to_string(),
                    selected: code == value,
                })
                .collect(),
        ),
        (FieldKind::Numeric, _) => ("number", Vec::new()),
        (FieldKind::Toggle, _) => ("checkbox", Vec::new()),
        _ => ("text", Vec::new()),
    };

    Widget {
        name: field.name(),
        label: field.label(),
        input,
        checked: field.is_checked(record),
        value,
        options,
        message: view.messages.get(&field).cloned().unwrap_or_default(),
        required: is_required(field),
        unit: field.unit().unwrap_or(""),
        refresh: field == Field::City,
    }
}
