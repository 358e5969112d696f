//! Dietary profile DTOs, form mapping, and the partial-update differ.
//!
//! The profile form edits a [`ProfileFormValues`]. On submit, the form's
//! current values are diffed against the values it was loaded with, and only
//! the fields that actually changed are sent as an [`UpdateProfileCommand`].
//! List fields are compared as sets after normalization, so reordering
//! chips or retyping `"Garlic"` as `"garlic "` is not a change.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::normalize::{normalize_string_array, string_sets_equal};
use crate::types::{Timestamp, UserId};

/// Maximum entries in a disliked-ingredients or preferred-cuisines list.
pub const MAX_LIST_ITEMS: usize = 50;

/// Maximum length of a single list entry, after trimming.
pub const MAX_ITEM_LEN: usize = 50;

// ---------------------------------------------------------------------------
// DietType
// ---------------------------------------------------------------------------

/// Diet types mirrored from the `diet_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    Omnivore,
    Vegetarian,
    Vegan,
    Pescatarian,
    Keto,
    Paleo,
    GlutenFree,
    DairyFree,
    LowCarb,
    Mediterranean,
}

impl DietType {
    /// Every variant, in display order.
    pub const ALL: [DietType; 10] = [
        Self::Omnivore,
        Self::Vegetarian,
        Self::Vegan,
        Self::Pescatarian,
        Self::Keto,
        Self::Paleo,
        Self::GlutenFree,
        Self::DairyFree,
        Self::LowCarb,
        Self::Mediterranean,
    ];

    /// Wire / database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Omnivore => "omnivore",
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::Pescatarian => "pescatarian",
            Self::Keto => "keto",
            Self::Paleo => "paleo",
            Self::GlutenFree => "gluten_free",
            Self::DairyFree => "dairy_free",
            Self::LowCarb => "low_carb",
            Self::Mediterranean => "mediterranean",
        }
    }

    /// Human-readable label, used when describing the diet to the AI provider.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Omnivore => "Omnivore",
            Self::Vegetarian => "Vegetarian",
            Self::Vegan => "Vegan",
            Self::Pescatarian => "Pescatarian",
            Self::Keto => "Keto",
            Self::Paleo => "Paleo",
            Self::GlutenFree => "Gluten-free",
            Self::DairyFree => "Dairy-free",
            Self::LowCarb => "Low-carb",
            Self::Mediterranean => "Mediterranean",
        }
    }
}

impl std::fmt::Display for DietType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DietType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown diet type: {s}")))
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// A row of the `profiles` table. `id` is the owning auth user's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDto {
    pub id: UserId,
    pub diet_type: Option<DietType>,
    #[serde(default)]
    pub disliked_ingredients: Vec<String>,
    #[serde(default)]
    pub preferred_cuisines: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Values edited by the profile form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFormValues {
    pub diet_type: Option<DietType>,
    #[serde(default)]
    pub disliked_ingredients: Vec<String>,
    #[serde(default)]
    pub preferred_cuisines: Vec<String>,
}

/// Partial profile update. Only present fields are written.
///
/// `diet_type` distinguishes "leave unchanged" (`None`, omitted on the wire)
/// from "clear" (`Some(None)`, sent as `null`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileCommand {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub diet_type: Option<Option<DietType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disliked_ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_cuisines: Option<Vec<String>>,
}

/// Maps a present JSON field (including `null`) to `Some(..)`. Absent fields
/// never reach this function and fall back to `#[serde(default)]`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl UpdateProfileCommand {
    /// True when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.diet_type.is_none()
            && self.disliked_ingredients.is_none()
            && self.preferred_cuisines.is_none()
    }

    /// Normalize list fields (trim, lowercase, dedup).
    pub fn normalized(self) -> Self {
        Self {
            diet_type: self.diet_type,
            disliked_ingredients: self
                .disliked_ingredients
                .map(|items| normalize_string_array(&items)),
            preferred_cuisines: self
                .preferred_cuisines
                .map(|items| normalize_string_array(&items)),
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Form values for an existing profile, or an empty form when the user has
/// not saved one yet.
pub fn profile_dto_to_form_values(profile: Option<&ProfileDto>) -> ProfileFormValues {
    match profile {
        Some(p) => ProfileFormValues {
            diet_type: p.diet_type,
            disliked_ingredients: p.disliked_ingredients.clone(),
            preferred_cuisines: p.preferred_cuisines.clone(),
        },
        None => ProfileFormValues::default(),
    }
}

/// Diff `current` against `initial`, producing only the changed fields.
///
/// Changed list fields are emitted normalized.
pub fn form_values_to_update_command(
    current: &ProfileFormValues,
    initial: &ProfileFormValues,
) -> UpdateProfileCommand {
    let mut command = UpdateProfileCommand::default();

    if current.diet_type != initial.diet_type {
        command.diet_type = Some(current.diet_type);
    }

    if !string_sets_equal(&current.disliked_ingredients, &initial.disliked_ingredients) {
        command.disliked_ingredients = Some(normalize_string_array(&current.disliked_ingredients));
    }

    if !string_sets_equal(&current.preferred_cuisines, &initial.preferred_cuisines) {
        command.preferred_cuisines = Some(normalize_string_array(&current.preferred_cuisines));
    }

    command
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an incoming update before it is written.
pub fn validate_update_profile(command: &UpdateProfileCommand) -> Result<(), CoreError> {
    if command.is_empty() {
        return Err(CoreError::Validation(
            "At least one profile field must be provided".into(),
        ));
    }
    if let Some(items) = &command.disliked_ingredients {
        validate_list("disliked_ingredients", items)?;
    }
    if let Some(items) = &command.preferred_cuisines {
        validate_list("preferred_cuisines", items)?;
    }
    Ok(())
}

fn validate_list(field: &str, items: &[String]) -> Result<(), CoreError> {
    if items.len() > MAX_LIST_ITEMS {
        return Err(CoreError::Validation(format!(
            "{field} may contain at most {MAX_LIST_ITEMS} entries"
        )));
    }
    for (i, item) in items.iter().enumerate() {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation(format!(
                "{field} entry at index {i} must not be empty"
            )));
        }
        if trimmed.chars().count() > MAX_ITEM_LEN {
            return Err(CoreError::Validation(format!(
                "{field} entry at index {i} exceeds {MAX_ITEM_LEN} characters"
            )));
        }
    }
    Ok(())
}
