// Form state for the onboarding and profile screens.
// A focused list of text and toggle fields edited from the keyboard.

use crate::profile::{Profile, mask_phone};

/// What a field holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Toggle(bool),
}

/// Text input behaviour for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMask {
    None,
    Phone,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: FieldValue,
    pub mask: InputMask,
}

impl FormField {
    pub fn text(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: FieldValue::Text(value.into()),
            mask: InputMask::None,
        }
    }

    pub fn phone(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: FieldValue::Text(value.into()),
            mask: InputMask::Phone,
        }
    }

    pub fn toggle(label: &'static str, on: bool) -> Self {
        Self {
            label,
            value: FieldValue::Toggle(on),
            mask: InputMask::None,
        }
    }

    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(text) => text,
            FieldValue::Toggle(_) => "",
        }
    }

    pub fn as_toggle(&self) -> bool {
        matches!(self.value, FieldValue::Toggle(true))
    }
}

/// Editable form with one focused field.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub fields: Vec<FormField>,
    pub focus: usize,
    /// Last validation or save message shown under the form.
    pub message: Option<String>,
}

impl FormState {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            focus: 0,
            message: None,
        }
    }

    /// First name and email, as asked during onboarding.
    pub fn onboarding() -> Self {
        Self::new(vec![
            FormField::text("First name", ""),
            FormField::text("Email", ""),
        ])
    }

    /// Every profile field, prefilled.
    pub fn profile(profile: &Profile) -> Self {
        Self::new(vec![
            FormField::text("First name", profile.first_name.clone()),
            FormField::text("Last name", profile.last_name.clone()),
            FormField::text("Email", profile.email.clone()),
            FormField::phone("Phone", profile.phone_number.clone()),
            FormField::toggle("Promotional emails", profile.notifications.promotions),
            FormField::toggle("Updates", profile.notifications.updates),
        ])
    }

    /// Read the profile fields back, keeping what the form does not edit.
    pub fn to_profile(&self, base: &Profile) -> Profile {
        let mut profile = base.clone();
        profile.first_name = self.text("First name").trim().to_string();
        profile.last_name = self.text("Last name").trim().to_string();
        profile.email = self.text("Email").trim().to_string();
        profile.phone_number = self.text("Phone").to_string();
        profile.notifications.promotions = self.toggle("Promotional emails");
        profile.notifications.updates = self.toggle("Updates");
        profile
    }

    pub fn text(&self, label: &str) -> &str {
        self.field(label).map(FormField::as_text).unwrap_or_default()
    }

    pub fn toggle(&self, label: &str) -> bool {
        self.field(label).is_some_and(FormField::as_toggle)
    }

    fn field(&self, label: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.label == label)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        match &mut field.value {
            FieldValue::Text(text) => {
                text.push(c);
                if field.mask == InputMask::Phone {
                    *text = mask_phone(text);
                }
            }
            FieldValue::Toggle(on) if c == ' ' => *on = !*on,
            FieldValue::Toggle(_) => {}
        }
    }

    pub fn backspace(&mut self) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        if let FieldValue::Text(text) = &mut field.value {
            if field.mask == InputMask::Phone {
                // Drop the last digit, then re-apply the mask.
                let mut digits: String = text.chars().filter(char::is_ascii_digit).collect();
                digits.pop();
                *text = mask_phone(&digits);
            } else {
                text.pop();
            }
        }
    }
}
