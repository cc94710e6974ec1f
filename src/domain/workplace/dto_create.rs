use serde::Serialize;
use validator::Validate;

use super::WorkplaceRecord;

/// Body of create (`POST`) and full update (`PUT`) requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct WorkplaceCreateDto {
    #[validate(length(min = 1, message = "workplace name is required"))]
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "PC")]
    pub pc: String,
    pub monitor: String,
    pub telephone: String,
}

impl From<&WorkplaceRecord> for WorkplaceCreateDto {
    fn from(record: &WorkplaceRecord) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone(),
            location: record.location.clone(),
            pc: record.pc.clone(),
            monitor: record.monitor.clone(),
            telephone: record.telephone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_backend_field_names() {
        let dto = WorkplaceCreateDto {
            name: "WS-1".into(),
            pc: "HP".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["Name"], "WS-1");
        assert_eq!(json["PC"], "HP");
        assert_eq!(json["Telephone"], "");
    }

    #[test]
    fn empty_name_fails_validation() {
        let dto = WorkplaceCreateDto::default();
        assert!(dto.validate().is_err());
    }
}
