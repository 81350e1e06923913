use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{Company, CompanyForCreation, CompanyForUpdate, Employee},
};

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// All companies, employees left unpopulated. No pagination.
    async fn list(&self) -> Result<Vec<Company>, ApiError>;

    /// Single company by id; `None` is the not-found sentinel, not an error.
    async fn get(&self, id: Uuid) -> Result<Option<Company>, ApiError>;

    /// Insert with a freshly generated id; the insert itself reports the
    /// stored row back, no second read.
    async fn create(&self, company: &CompanyForCreation) -> Result<Company, ApiError>;

    /// Full overwrite of name/address/country. A zero-row update is a
    /// silent success; callers wanting 404 semantics check existence first.
    async fn update(&self, id: Uuid, company: &CompanyForUpdate) -> Result<(), ApiError>;

    /// Delete by id. Deleting a company that still has employees fails
    /// with a conflict from the foreign key constraint.
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;

    /// Company owning the given employee, via the
    /// `show_company_for_provided_employee_id` stored routine.
    async fn get_by_employee_id(&self, employee_id: Uuid) -> Result<Option<Company>, ApiError>;

    /// Company plus its employees, fetched as two sequential statements on
    /// one connection. The employee statement is skipped when the company
    /// is absent.
    async fn get_with_employees(&self, id: Uuid) -> Result<Option<Company>, ApiError>;

    /// All companies that have at least one employee, each with its
    /// employees populated, from a single inner-join query grouped
    /// client-side.
    async fn list_with_employees(&self) -> Result<Vec<Company>, ApiError>;

    /// Insert every entry inside one transaction; any failure rolls the
    /// whole batch back. An empty list commits a no-op.
    async fn create_many(&self, companies: &[CompanyForCreation])
        -> Result<Vec<Company>, ApiError>;
}

pub struct SqlxCompanyRepository {
    pool: PgPool,
}

impl SqlxCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// One row of the companies-to-employees inner join.
#[derive(sqlx::FromRow)]
struct CompanyEmployeeRow {
    id: Uuid,
    name: String,
    address: String,
    country: String,
    employee_id: Uuid,
    employee_name: String,
    age: i32,
    position: String,
    company_id: Uuid,
}

/// Fold joined rows into distinct companies keyed by id, preserving the
/// first-occurrence order of each company in the row stream.
fn fold_company_rows(rows: Vec<CompanyEmployeeRow>) -> Vec<Company> {
    let mut companies: Vec<Company> = Vec::new();
    let mut index_by_id: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        let employee = Employee {
            id: row.employee_id,
            name: row.employee_name,
            age: row.age,
            position: row.position,
            company_id: row.company_id,
        };

        match index_by_id.get(&row.id) {
            Some(&idx) => companies[idx].employees.push(employee),
            None => {
                index_by_id.insert(row.id, companies.len());
                companies.push(Company {
                    id: row.id,
                    name: row.name,
                    address: row.address,
                    country: row.country,
                    employees: vec![employee],
                });
            }
        }
    }

    companies
}

#[async_trait]
impl CompanyRepository for SqlxCompanyRepository {
    async fn list(&self) -> Result<Vec<Company>, ApiError> {
        let rows = sqlx::query_as::<_, Company>(
            "SELECT id, name, address, country FROM companies ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Company>, ApiError> {
        let row = sqlx::query_as::<_, Company>(
            "SELECT id, name, address, country FROM companies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, company: &CompanyForCreation) -> Result<Company, ApiError> {
        let id = Uuid::new_v4();

        let row = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (id, name, address, country)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, address, country
            "#,
        )
        .bind(id)
        .bind(&company.name)
        .bind(&company.address)
        .bind(&company.country)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Uuid, company: &CompanyForUpdate) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            UPDATE companies
            SET name = $2, address = $3, country = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&company.name)
        .bind(&company.address)
        .bind(&company.country)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_by_employee_id(&self, employee_id: Uuid) -> Result<Option<Company>, ApiError> {
        let row = sqlx::query_as::<_, Company>(
            "SELECT id, name, address, country FROM show_company_for_provided_employee_id($1)",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_with_employees(&self, id: Uuid) -> Result<Option<Company>, ApiError> {
        let mut conn = self.pool.acquire().await?;

        let company = sqlx::query_as::<_, Company>(
            "SELECT id, name, address, country FROM companies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(mut company) = company else {
            return Ok(None);
        };

        company.employees = sqlx::query_as::<_, Employee>(
            "SELECT id, name, age, position, company_id FROM employees WHERE company_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Some(company))
    }

    async fn list_with_employees(&self) -> Result<Vec<Company>, ApiError> {
        let rows = sqlx::query_as::<_, CompanyEmployeeRow>(
            r#"
            SELECT c.id, c.name, c.address, c.country,
                   e.id AS employee_id, e.name AS employee_name,
                   e.age, e.position, e.company_id
            FROM companies c
            JOIN employees e ON c.id = e.company_id
            ORDER BY c.name, e.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(fold_company_rows(rows))
    }

    async fn create_many(
        &self,
        companies: &[CompanyForCreation],
    ) -> Result<Vec<Company>, ApiError> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(companies.len());

        for company in companies {
            let row = sqlx::query_as::<_, Company>(
                r#"
                INSERT INTO companies (id, name, address, country)
                VALUES ($1, $2, $3, $4)
                RETURNING id, name, address, country
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&company.name)
            .bind(&company.address)
            .bind(&company.country)
            .fetch_one(&mut *tx)
            .await?;

            created.push(row);
        }

        tx.commit().await?;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        company_id: Uuid,
        company_name: &str,
        employee_id: Uuid,
        employee_name: &str,
    ) -> CompanyEmployeeRow {
        CompanyEmployeeRow {
            id: company_id,
            name: company_name.to_string(),
            address: "1 Main St".to_string(),
            country: "US".to_string(),
            employee_id,
            employee_name: employee_name.to_string(),
            age: 30,
            position: "Engineer".to_string(),
            company_id,
        }
    }

    #[test]
    fn test_fold_groups_employees_under_one_company() {
        let company_id = Uuid::new_v4();
        let rows = vec![
            row(company_id, "Acme", Uuid::new_v4(), "Sam"),
            row(company_id, "Acme", Uuid::new_v4(), "Jo"),
        ];

        let companies = fold_company_rows(rows);

        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Acme");
        assert_eq!(companies[0].employees.len(), 2);
        assert_eq!(companies[0].employees[0].name, "Sam");
        assert_eq!(companies[0].employees[1].name, "Jo");
    }

    #[test]
    fn test_fold_preserves_first_occurrence_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let rows = vec![
            row(first, "Zebra Corp", Uuid::new_v4(), "Ada"),
            row(second, "Acme", Uuid::new_v4(), "Ben"),
            row(first, "Zebra Corp", Uuid::new_v4(), "Cleo"),
        ];

        let companies = fold_company_rows(rows);

        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].id, first);
        assert_eq!(companies[0].employees.len(), 2);
        assert_eq!(companies[1].id, second);
        assert_eq!(companies[1].employees.len(), 1);
    }

    #[test]
    fn test_fold_of_empty_stream_is_empty() {
        assert!(fold_company_rows(Vec::new()).is_empty());
    }

    #[test]
    fn test_fold_sets_employee_foreign_key() {
        let company_id = Uuid::new_v4();
        let companies = fold_company_rows(vec![row(company_id, "Acme", Uuid::new_v4(), "Sam")]);

        assert_eq!(companies[0].employees[0].company_id, company_id);
    }
}
