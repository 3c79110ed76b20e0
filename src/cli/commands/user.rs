use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_success, output_users};
use crate::cli::{connect, service, OutputFormat};
use crate::database::models::NewUser;
use crate::types::Role;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create an account with any role")]
    Add {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        #[arg(long, help = "STUDENT, FACULTY or PRINCIPAL")]
        role: Role,

        #[arg(long)]
        password: String,

        #[arg(long)]
        department: Option<String>,

        #[arg(long)]
        roll_number: Option<String>,
    },

    #[command(about = "List accounts")]
    List {
        #[arg(long, help = "Only show this role")]
        role: Option<Role>,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let service = service(connect().await?);

    match cmd {
        UserCommands::Add {
            email,
            name,
            role,
            password,
            department,
            roll_number,
        } => {
            let new_user = NewUser {
                email,
                name,
                password,
                department,
                roll_number,
            };
            let user = service.create_user(new_user, role).await.map_err(describe)?;

            output_success(
                output_format,
                &format!("Created {} account {}", user.role, user.email),
                Some(json!({ "user": user })),
            )
        }
        UserCommands::List { role } => {
            let users = match role {
                Some(role) => service.users_with_role(role).await?,
                None => {
                    let mut all = Vec::new();
                    for role in Role::ALL {
                        all.extend(service.users_with_role(*role).await?);
                    }
                    all
                }
            };
            output_users(output_format, &users)
        }
    }
}

/// Flatten field errors into one line for terminal output
fn describe(err: crate::services::ServiceError) -> anyhow::Error {
    match err {
        crate::services::ServiceError::Validation(fields) => {
            let details: Vec<String> = fields.iter().map(|(field, msg)| format!("{} {}", field, msg)).collect();
            anyhow::anyhow!("invalid user: {}", details.join(", "))
        }
        other => other.into(),
    }
}
