use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::User;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data) = data {
                response["data"] = data;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "success": false, "error": message }))?
            );
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

pub fn output_users(output_format: OutputFormat, users: &[User]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "users": users }))?);
        }
        OutputFormat::Text => {
            if users.is_empty() {
                println!("No users found");
                return Ok(());
            }
            println!("{:<36} {:<10} {:<30} {:<20} {}", "ID", "ROLE", "EMAIL", "NAME", "MENTOR");
            println!("{}", "-".repeat(110));
            for user in users {
                let mentor = user.mentor_id.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<36} {:<10} {:<30} {:<20} {}",
                    user.id,
                    user.role.as_str(),
                    user.email,
                    user.name,
                    mentor
                );
            }
        }
    }
    Ok(())
}
