use serde::{Deserialize, Serialize};

pub type CategoryID = i64;

/// Target audience of a category.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AudienceGender {
    Male,
    Female,
    #[default]
    Mixte,
}

impl std::fmt::Display for AudienceGender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AudienceGender::Male => "male",
                AudienceGender::Female => "female",
                AudienceGender::Mixte => "mixte",
            }
        )?;
        Ok(())
    }
}

/// A marketplace category.
///
/// `name` and `description` carry the text localized into the requested
/// language; the `*_fr` / `*_ar` fields are present when the backend returns
/// the raw translations as well.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryID,
    #[serde(default)]
    pub parent_id: Option<CategoryID>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub name_fr: Option<String>,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub description_fr: Option<String>,
    #[serde(default)]
    pub description_ar: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub gender: Option<AudienceGender>,
    #[serde(default)]
    pub age_min: Option<u32>,
    #[serde(default)]
    pub age_max: Option<u32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
}

impl Category {
    /// Best display name: the localized name, then French, then Arabic.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.name_fr.as_deref())
            .or(self.name_ar.as_deref())
            .unwrap_or("")
    }

    /// Best display description, following the same fallback as [`Category::display_name`].
    pub fn display_description(&self) -> &str {
        self.description
            .as_deref()
            .or(self.description_fr.as_deref())
            .or(self.description_ar.as_deref())
            .unwrap_or("")
    }
}
