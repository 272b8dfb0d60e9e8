use serde::Deserialize;

use super::Entity;

/// Display color of a grade category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Color {
    pub id: u64,
    /// Hex triplet without the leading `#`.
    #[serde(rename = "RGB")]
    pub rgb: String,
    pub name: String,
}

impl Color {
    /// CSS-style `#rrggbb`.
    #[must_use]
    pub fn hex(&self) -> String {
        format!("#{}", self.rgb)
    }
}

impl Entity for Color {
    type Id = u64;

    const NAME: &'static str = "Color";
    const SINGULAR: &'static str = "Color";
    const PLURAL: &'static str = "Colors";
    const PATH: &'static str = "Colors";

    fn id(&self) -> &u64 {
        &self.id
    }
}
