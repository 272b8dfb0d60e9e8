use serde::Deserialize;

use super::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subject {
    pub id: u64,
    pub name: String,
    pub no: u64,
    pub short: String,
    pub is_extracurricular: bool,
    pub is_block_lesson: bool,
}

impl Entity for Subject {
    type Id = u64;

    const NAME: &'static str = "Subject";
    const SINGULAR: &'static str = "Subject";
    const PLURAL: &'static str = "Subjects";
    const PATH: &'static str = "Subjects";

    fn id(&self) -> &u64 {
        &self.id
    }
}
