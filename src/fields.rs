//! Per-field editing driven by the runtime kind of a reflected value.
//!
//! Every editable surface in the overlay (generic component fields,
//! state-machine action fields, graph variables) funnels through the same
//! policy: classify the value once into a closed set of kinds, then
//! dispatch on the tag. Numeric kinds edit through a text field that is
//! re-seeded from the live value every frame; a parse failure simply
//! drops that frame's edit.

use bevy::prelude::*;
use bevy::reflect::PartialReflect;
use bevy_egui::egui;
use thiserror::Error;

use crate::ui::theme::colors;

/// Closed set of value kinds the field editor understands.
///
/// Classification happens once per field; rendering is a match over the
/// tag. First match wins, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Text,
    Int,
    Float,
    Opaque,
}

/// Failure reading, parsing, or writing a single field.
///
/// These never abort a panel: the owning control degrades to a name-only
/// label and the next field renders normally.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("`{0}` is not a valid {1}")]
    Parse(String, &'static str),
    #[error("referenced entity no longer exists")]
    Stale,
    #[error("reflection access denied for {0}")]
    Denied(&'static str),
}

/// What happened to one field during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Unchanged,
    Changed,
    /// The value could not be read or edited; only its name was shown.
    Fallback,
}

impl EditOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, EditOutcome::Changed)
    }
}

/// Classify a reflected value into its editing kind.
pub fn classify(value: &dyn PartialReflect) -> ValueKind {
    if value.try_downcast_ref::<bool>().is_some() {
        return ValueKind::Bool;
    }
    if value.try_downcast_ref::<String>().is_some() {
        return ValueKind::Text;
    }
    if value.try_downcast_ref::<i32>().is_some()
        || value.try_downcast_ref::<i64>().is_some()
        || value.try_downcast_ref::<u32>().is_some()
        || value.try_downcast_ref::<u64>().is_some()
        || value.try_downcast_ref::<usize>().is_some()
    {
        return ValueKind::Int;
    }
    if value.try_downcast_ref::<f32>().is_some() || value.try_downcast_ref::<f64>().is_some() {
        return ValueKind::Float;
    }
    ValueKind::Opaque
}

/// Parse `text` and write it into `slot` if it differs from the current
/// value. Returns whether the value changed. A parse failure leaves the
/// slot untouched.
pub fn commit<T>(
    slot: &mut dyn PartialReflect,
    text: &str,
    kind: &'static str,
) -> Result<bool, FieldError>
where
    T: std::str::FromStr + Reflect + PartialEq,
{
    let parsed: T = text
        .trim()
        .parse()
        .map_err(|_| FieldError::Parse(text.to_string(), kind))?;
    let value = slot
        .try_downcast_mut::<T>()
        .ok_or(FieldError::Denied(kind))?;
    if *value == parsed {
        Ok(false)
    } else {
        *value = parsed;
        Ok(true)
    }
}

/// Draw a name label followed by the kind-appropriate control.
pub fn edit_field(ui: &mut egui::Ui, name: &str, value: &mut dyn PartialReflect) -> EditOutcome {
    let mut outcome = EditOutcome::Unchanged;
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(name).color(colors::TEXT_SECONDARY));
        outcome = edit_value(ui, value);
    });
    outcome
}

/// Draw just the control for a value, dispatching on its kind.
pub fn edit_value(ui: &mut egui::Ui, value: &mut dyn PartialReflect) -> EditOutcome {
    match classify(value) {
        ValueKind::Bool => bool_control(ui, value),
        ValueKind::Text => text_control(ui, value),
        ValueKind::Int => {
            if value.try_downcast_ref::<i32>().is_some() {
                scalar_control::<i32>(ui, value, "integer")
            } else if value.try_downcast_ref::<i64>().is_some() {
                scalar_control::<i64>(ui, value, "integer")
            } else if value.try_downcast_ref::<u32>().is_some() {
                scalar_control::<u32>(ui, value, "integer")
            } else if value.try_downcast_ref::<u64>().is_some() {
                scalar_control::<u64>(ui, value, "integer")
            } else {
                scalar_control::<usize>(ui, value, "integer")
            }
        }
        ValueKind::Float => {
            if value.try_downcast_ref::<f32>().is_some() {
                scalar_control::<f32>(ui, value, "number")
            } else {
                scalar_control::<f64>(ui, value, "number")
            }
        }
        ValueKind::Opaque => {
            ui.label(egui::RichText::new(display_string(value)).color(colors::TEXT_MUTED));
            EditOutcome::Unchanged
        }
    }
}

/// Read-only name/value row for values the editor cannot edit.
pub fn readonly_field(ui: &mut egui::Ui, name: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(name).color(colors::TEXT_SECONDARY));
        ui.label(egui::RichText::new(value).color(colors::TEXT_MUTED));
    });
}

/// Name-only row used when a field's value cannot even be read.
pub fn fallback_label(ui: &mut egui::Ui, name: &str) -> EditOutcome {
    ui.label(egui::RichText::new(name).color(colors::TEXT_MUTED));
    EditOutcome::Fallback
}

/// String form of an arbitrary reflected value for display.
pub fn display_string(value: &dyn PartialReflect) -> String {
    let text = format!("{value:?}");
    if text.len() > 96 {
        let cut = text
            .char_indices()
            .take_while(|(i, _)| *i < 93)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &text[..cut])
    } else {
        text
    }
}

fn bool_control(ui: &mut egui::Ui, value: &mut dyn PartialReflect) -> EditOutcome {
    let Some(v) = value.try_downcast_mut::<bool>() else {
        return EditOutcome::Fallback;
    };
    if ui.checkbox(v, "").changed() {
        EditOutcome::Changed
    } else {
        EditOutcome::Unchanged
    }
}

fn text_control(ui: &mut egui::Ui, value: &mut dyn PartialReflect) -> EditOutcome {
    let Some(v) = value.try_downcast_mut::<String>() else {
        return EditOutcome::Fallback;
    };
    // Raw text writes back as typed, no validation.
    if ui.text_edit_singleline(v).changed() {
        EditOutcome::Changed
    } else {
        EditOutcome::Unchanged
    }
}

/// Shared numeric path: seed the control from the value's decimal string,
/// parse on change, keep the old value when parsing fails.
fn scalar_control<T>(
    ui: &mut egui::Ui,
    value: &mut dyn PartialReflect,
    kind: &'static str,
) -> EditOutcome
where
    T: std::str::FromStr + std::fmt::Display + Reflect + PartialEq,
{
    let mut text = match value.try_downcast_ref::<T>() {
        Some(current) => current.to_string(),
        None => return EditOutcome::Fallback,
    };
    let mut outcome = EditOutcome::Unchanged;
    if ui
        .add(egui::TextEdit::singleline(&mut text).desired_width(72.0))
        .changed()
    {
        match commit::<T>(value, &text, kind) {
            Ok(true) => outcome = EditOutcome::Changed,
            Ok(false) | Err(FieldError::Parse(..)) => {}
            Err(_) => outcome = EditOutcome::Fallback,
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_precedence_is_fixed() {
        assert_eq!(classify(&true), ValueKind::Bool);
        assert_eq!(classify(&String::from("hi")), ValueKind::Text);
        assert_eq!(classify(&42i32), ValueKind::Int);
        assert_eq!(classify(&42u64), ValueKind::Int);
        assert_eq!(classify(&1.5f32), ValueKind::Float);
        assert_eq!(classify(&Vec3::ONE), ValueKind::Opaque);
    }

    #[test]
    fn commit_parses_and_writes_floats() {
        let mut value = 1.5f32;
        let changed = commit::<f32>(&mut value, "2.25", "number").unwrap();
        assert!(changed);
        assert_eq!(value, 2.25);
    }

    #[test]
    fn commit_leaves_value_on_parse_failure() {
        let mut value = 1.5f32;
        let err = commit::<f32>(&mut value, "abc", "number").unwrap_err();
        assert!(matches!(err, FieldError::Parse(..)));
        assert_eq!(value, 1.5);
    }

    #[test]
    fn commit_reports_unchanged_for_equal_input() {
        let mut value = 7i32;
        assert!(!commit::<i32>(&mut value, " 7 ", "integer").unwrap());
    }

    #[test]
    fn commit_denies_type_mismatch() {
        let mut value = 7i32;
        let err = commit::<f32>(&mut value, "1.0", "number").unwrap_err();
        assert!(matches!(err, FieldError::Denied(_)));
        assert_eq!(value, 7);
    }
}
