//! # Employee Repository
//!
//! Database operations for staff members.
//!
//! `working_hours` is split over two columns so either end can be read by
//! plain SQL; `specialties` is JSON text; `available` is INTEGER 0/1.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::{
    count_rows, decode_list, delete_row, encode_list, generate_id, UpdateStatement,
};
use salon_core::{Employee, EmployeePatch, NewEmployee, WorkingHours, EMPLOYEE_ID_PREFIX};

const TABLE: &str = "employees";

#[derive(Debug, FromRow)]
struct EmployeeRow {
    id: String,
    name: String,
    role: String,
    email: String,
    phone: String,
    photo: Option<String>,
    available: bool,
    specialties: Option<String>,
    rating: f64,
    next_available: Option<String>,
    working_hours_start: String,
    working_hours_end: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EmployeeRow {
    fn into_employee(self) -> DbResult<Employee> {
        Ok(Employee {
            id: self.id,
            name: self.name,
            role: self.role,
            email: self.email,
            phone: self.phone,
            photo: self.photo,
            available: self.available,
            specialties: decode_list("specialties", self.specialties)?,
            rating: self.rating,
            next_available: self.next_available,
            working_hours: WorkingHours {
                start: self.working_hours_start,
                end: self.working_hours_end,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for employee database operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Lists every employee, ordered by name.
    pub async fn get_all(&self) -> DbResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT
                id, name, role, email, phone, photo,
                available, specialties, rating, next_available,
                working_hours_start, working_hours_end,
                created_at, updated_at
            FROM employees
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded employees");
        rows.into_iter().map(EmployeeRow::into_employee).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT
                id, name, role, email, phone, photo,
                available, specialties, rating, next_available,
                working_hours_start, working_hours_end,
                created_at, updated_at
            FROM employees
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EmployeeRow::into_employee).transpose()
    }

    /// Creates an employee with a generated `emp-` id.
    ///
    /// Omitted rating becomes 5.0 and omitted working hours become
    /// 09:00 to 18:00.
    pub async fn create(&self, input: NewEmployee) -> DbResult<Employee> {
        let employee = input.into_employee(generate_id(EMPLOYEE_ID_PREFIX), Utc::now());

        debug!(id = %employee.id, role = %employee.role, "Creating employee");
        self.insert(&employee).await?;

        Ok(employee)
    }

    /// Inserts a fully materialized employee as-is.
    pub async fn insert(&self, employee: &Employee) -> DbResult<()> {
        let specialties = encode_list("specialties", &employee.specialties)?;

        sqlx::query(
            r#"
            INSERT INTO employees (
                id, name, role, email, phone, photo,
                available, specialties, rating, next_available,
                working_hours_start, working_hours_end,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10,
                ?11, ?12,
                ?13, ?14
            )
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.name)
        .bind(&employee.role)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(&employee.photo)
        .bind(employee.available)
        .bind(specialties)
        .bind(employee.rating)
        .bind(&employee.next_available)
        .bind(&employee.working_hours.start)
        .bind(&employee.working_hours.end)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes the fields present in `patch` and refreshes `updated_at`.
    pub async fn update(&self, id: &str, patch: EmployeePatch) -> DbResult<()> {
        let (start, end) = match patch.working_hours {
            Some(hours) => (Some(hours.start), Some(hours.end)),
            None => (None, None),
        };

        let mut stmt = UpdateStatement::new(TABLE);
        stmt.set("name", patch.name)
            .set("role", patch.role)
            .set("email", patch.email)
            .set("phone", patch.phone)
            .set("photo", patch.photo)
            .set("available", patch.available)
            .set("rating", patch.rating)
            .set("next_available", patch.next_available)
            .set("working_hours_start", start)
            .set("working_hours_end", end);
        stmt.set_json("specialties", patch.specialties.as_deref())?;

        let fields = stmt.assignments();
        let affected = stmt.execute(&self.pool, id).await?;

        debug!(id = %id, fields, affected, "Updated employee");
        Ok(())
    }

    /// Hard-deletes an employee. Blocked while appointments reference it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let affected = delete_row(&self.pool, TABLE, id).await?;
        debug!(id = %id, affected, "Deleted employee");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        count_rows(&self.pool, TABLE).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
