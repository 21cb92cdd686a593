use anyhow::{Result, anyhow};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::StoreClient;

use crate::models::{CreateDepartmentRequest, Department, UpdateDepartmentRequest};

pub struct DepartmentService {
    store: StoreClient,
}

impl DepartmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    pub async fn create_department(
        &self,
        hospital_id: Uuid,
        request: CreateDepartmentRequest,
        auth_token: &str,
    ) -> Result<Department> {
        debug!("Creating department '{}' for hospital {}", request.name, hospital_id);

        if request.name.trim().is_empty() {
            return Err(anyhow!("Department name must not be empty"));
        }

        let department_data = json!({
            "hospital_id": hospital_id,
            "name": request.name,
            "description": request.description
        });

        let created = self.store
            .insert_returning("departments", department_data, Some(auth_token))
            .await?;

        let department: Department = serde_json::from_value(created)?;
        Ok(department)
    }

    pub async fn list_departments(
        &self,
        hospital_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Department>> {
        let filter = format!("hospital_id=eq.{}&order=name.asc", hospital_id);
        let result = self.store
            .select("departments", &filter, Some(auth_token))
            .await?;

        let departments: Vec<Department> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Department>, _>>()?;

        Ok(departments)
    }

    pub async fn update_department(
        &self,
        hospital_id: Uuid,
        department_id: &str,
        request: UpdateDepartmentRequest,
        auth_token: &str,
    ) -> Result<Department> {
        debug!("Updating department: {}", department_id);

        self.get_owned_department(hospital_id, department_id, auth_token).await?;

        let mut update_data = serde_json::Map::new();
        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(anyhow!("Department name must not be empty"));
            }
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(description) = request.description {
            update_data.insert("description".to_string(), json!(description));
        }

        let filter = format!("id=eq.{}", department_id);
        let result: Vec<Value> = self.store
            .patch_returning("departments", &filter, Value::Object(update_data), Some(auth_token))
            .await?;

        let record = result.into_iter().next()
            .ok_or_else(|| anyhow!("Failed to update department"))?;

        let department: Department = serde_json::from_value(record)?;
        Ok(department)
    }

    /// Remove a department. Doctors keep their department reference; the
    /// dangling id is tolerated by the reading side.
    pub async fn delete_department(
        &self,
        hospital_id: Uuid,
        department_id: &str,
        auth_token: &str,
    ) -> Result<()> {
        debug!("Deleting department: {}", department_id);

        self.get_owned_department(hospital_id, department_id, auth_token).await?;

        let filter = format!("id=eq.{}", department_id);
        self.store.delete("departments", &filter, Some(auth_token)).await?;

        Ok(())
    }

    async fn get_owned_department(
        &self,
        hospital_id: Uuid,
        department_id: &str,
        auth_token: &str,
    ) -> Result<Department> {
        let result = self.store
            .select_by_field("departments", "id", department_id, Some(auth_token))
            .await?;

        let record = result.into_iter().next()
            .ok_or_else(|| anyhow!("Department not found"))?;

        let department: Department = serde_json::from_value(record)?;

        if department.hospital_id != hospital_id {
            return Err(anyhow!("Department belongs to a different hospital"));
        }

        Ok(department)
    }
}
