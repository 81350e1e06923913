use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A company row. `employees` is only populated by the join and
/// multi-result reads; plain reads leave it empty.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub country: String,
    #[serde(default)]
    #[sqlx(skip)]
    pub employees: Vec<Employee>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub position: String,
    pub company_id: Uuid,
}

/// Input-only shape for creating a company; the id is server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyForCreation {
    pub name: String,
    pub address: String,
    pub country: String,
}

/// Input-only shape for updating a company. All three fields are
/// overwritten together, never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyForUpdate {
    pub name: String,
    pub address: String,
    pub country: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_serializes_with_empty_employees() {
        let company = Company {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            address: "1 Main St".to_string(),
            country: "US".to_string(),
            employees: Vec::new(),
        };

        let value = serde_json::to_value(&company).unwrap();
        assert_eq!(value["name"], "Acme");
        assert_eq!(value["employees"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_company_deserializes_without_employees_field() {
        let json = r#"{
            "id": "6fe8c2d0-0c3e-4f9a-9e55-111111111111",
            "name": "Acme",
            "address": "1 Main St",
            "country": "US"
        }"#;

        let company: Company = serde_json::from_str(json).unwrap();
        assert!(company.employees.is_empty());
    }

    #[test]
    fn test_creation_dto_has_no_id() {
        let json = r#"{"name":"Acme","address":"1 Main St","country":"US"}"#;
        let dto: CompanyForCreation = serde_json::from_str(json).unwrap();
        assert_eq!(dto.name, "Acme");
        assert_eq!(dto.address, "1 Main St");
        assert_eq!(dto.country, "US");
    }
}
