//! Livestock records and lookup data

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Entry of `GET /breed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub breed_name: String,
}

/// Entry of `GET /livestocktype`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivestockType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub livestock_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Livestock {
    pub id: i64,
    pub tag_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub livestock_type: Option<LivestockType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<Breed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Livestock {
    pub fn type_name(&self) -> Option<&str> {
        self.livestock_type.as_ref().map(|t| t.livestock_type.as_str())
    }

    pub fn breed_name(&self) -> Option<&str> {
        self.breed.as_ref().map(|b| b.breed_name.as_str())
    }
}

/// Search over name and tag id for the livestock list view
pub fn filter_livestock<'a>(items: &'a [Livestock], search: Option<&str>) -> Vec<&'a Livestock> {
    let Some(term) = search.map(str::to_lowercase) else {
        return items.iter().collect();
    };

    items
        .iter()
        .filter(|item| {
            item.name.to_lowercase().contains(&term) || item.tag_id.to_lowercase().contains(&term)
        })
        .collect()
}
