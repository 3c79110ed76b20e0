use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::output_success;
use crate::cli::{connect, service, OutputFormat};

#[derive(Subcommand)]
pub enum MentorCommands {
    #[command(about = "Assign a faculty mentor to a student")]
    Assign {
        #[arg(help = "Student user id")]
        student: Uuid,

        #[arg(help = "Faculty user id")]
        faculty: Uuid,
    },
}

pub async fn handle(cmd: MentorCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let service = service(connect().await?);

    match cmd {
        MentorCommands::Assign { student, faculty } => {
            let student = service.assign_mentor(student, faculty).await?;
            output_success(
                output_format,
                &format!("{} is now mentored by {}", student.email, faculty),
                Some(json!({ "student": student })),
            )
        }
    }
}
