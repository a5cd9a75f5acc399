//! `healthsync` command-line front end.
//!
//! Each invocation builds a fresh directory from the configured fixtures, runs one command
//! against it and exits. Appended records live only for the duration of that run.

use clap::{Parser, Subcommand};
use healthsync_core::config::{
    fixture_source_from_env_value, orphan_policy_from_env_value, FixtureSource,
};
use healthsync_core::constants::{FIXTURES_ENV_VAR, ORPHAN_POLICY_ENV_VAR};
use healthsync_core::timeline::timeline;
use healthsync_core::{
    CoreConfig, DetailsView, Directory, IdentityProvider, Patient, RecordDraft, Role, Session,
    TimelineEntry,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "healthsync")]
#[command(about = "HealthSync patient directory CLI")]
struct Cli {
    /// YAML fixture file to seed the directory from (overrides HEALTHSYNC_FIXTURES)
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search patients by name, email or phone (no query lists everyone)
    Search {
        /// Free-text query
        query: Option<String>,
    },
    /// Show a patient's profile and medical timeline
    Show {
        /// Patient id
        id: String,
    },
    /// Show a patient's medical timeline only
    Records {
        /// Patient id
        id: String,
    },
    /// Add a medical record for this run and print the updated timeline
    AddRecord {
        /// Patient id
        #[arg(long)]
        patient: String,
        /// Record type: vitals, medication, lab or visit
        #[arg(long)]
        kind: String,
        /// Date (YYYY-MM-DD) or date-time (RFC 3339)
        #[arg(long)]
        date: String,
        /// Record title
        #[arg(long)]
        title: String,
        /// Provider name
        #[arg(long)]
        provider: String,
        /// Free-text details
        #[arg(long, conflicts_with = "fields")]
        text: Option<String>,
        /// Structured detail as key=value (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// Start a mock session and print the signed-in user
    Whoami {
        /// Email to sign in with
        #[arg(long)]
        email: String,
        /// Role: doctor, lab or admin
        #[arg(long)]
        role: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("healthsync=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'healthsync --help' for commands");
        return Ok(());
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Search { query } => {
            let directory = build_directory(cli.fixtures)?;
            search(&directory, query.as_deref(), cli.json, &mut out)?;
        }
        Commands::Show { id } => {
            let mut directory = build_directory(cli.fixtures)?;
            show(&mut directory, &id, cli.json, &mut out)?;
        }
        Commands::Records { id } => {
            let directory = build_directory(cli.fixtures)?;
            records(&directory, &id, cli.json, &mut out)?;
        }
        Commands::AddRecord {
            patient,
            kind,
            date,
            title,
            provider,
            text,
            fields,
        } => {
            let draft = RecordDraft {
                patient_id: patient,
                kind,
                date,
                title,
                provider,
                details_text: text,
                detail_fields: fields,
            };
            let mut directory = build_directory(cli.fixtures)?;
            add_record(&mut directory, draft, cli.json, &mut out)?;
        }
        Commands::Whoami { email, role } => whoami(&email, &role, cli.json, &mut out)?,
    }

    Ok(())
}

/// Resolves configuration once and seeds a directory from it.
fn build_directory(fixtures_override: Option<PathBuf>) -> anyhow::Result<Directory> {
    let fixtures = match fixtures_override {
        Some(path) => FixtureSource::File(path),
        None => fixture_source_from_env_value(std::env::var(FIXTURES_ENV_VAR).ok())?,
    };
    let orphan_policy = orphan_policy_from_env_value(std::env::var(ORPHAN_POLICY_ENV_VAR).ok())?;
    tracing::debug!(fixtures = ?fixtures, %orphan_policy, "building directory");
    Ok(Directory::new(CoreConfig::new(fixtures, orphan_policy))?)
}

fn search(
    directory: &Directory,
    query: Option<&str>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let patients = directory.search(query.unwrap_or(""));
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&patients)?)?;
    } else if patients.is_empty() {
        writeln!(out, "No patients found.")?;
    } else {
        for patient in &patients {
            write_patient_row(out, patient)?;
        }
    }
    Ok(())
}

fn show(
    directory: &mut Directory,
    id: &str,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    directory.select_by_id(id)?;
    let profile = directory.profile(id)?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&profile)?)?;
    } else {
        write_patient_details(out, &profile.patient)?;
        writeln!(out)?;
        write_timeline(out, &timeline(&profile.records))?;
    }
    Ok(())
}

fn records(
    directory: &Directory,
    id: &str,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let entries = timeline(&directory.records_for(id));
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
    } else {
        write_timeline(out, &entries)?;
    }
    Ok(())
}

fn add_record(
    directory: &mut Directory,
    draft: RecordDraft,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let stored = directory.append_record(draft.validate()?)?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&stored)?)?;
    } else {
        writeln!(out, "Added record {} for patient {}", stored.id, stored.patient_id)?;
        writeln!(out)?;
        write_timeline(out, &timeline(&directory.records_for(&stored.patient_id)))?;
    }
    Ok(())
}

fn whoami(email: &str, role: &str, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let role: Role = role.parse()?;
    let mut session = Session::new();
    let user = session.login(email, "", role)?.clone();

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&user)?)?;
        return Ok(());
    }

    writeln!(out, "Signed in: {}", session.is_authenticated())?;
    writeln!(out, "Name: {}", user.name)?;
    writeln!(out, "Email: {}", user.email)?;
    if let Some(role) = session.current_role() {
        writeln!(out, "Role: {}", role)?;
    }
    if let Some(license) = &user.license_id {
        writeln!(out, "License: {}", license)?;
    }
    if let Some(lab) = &user.lab_id {
        writeln!(out, "Lab: {}", lab)?;
    }
    Ok(())
}

fn write_patient_row(out: &mut impl Write, patient: &Patient) -> io::Result<()> {
    writeln!(
        out,
        "ID: {}, Name: {}, Phone: {}, Email: {}",
        patient.id, patient.name, patient.phone, patient.email
    )
}

fn write_patient_details(out: &mut impl Write, patient: &Patient) -> io::Result<()> {
    writeln!(out, "{} (ID: {})", patient.name, patient.id)?;
    writeln!(out, "Age: {}, Gender: {}", patient.age, patient.gender)?;
    writeln!(out, "Born: {}", patient.date_of_birth)?;
    writeln!(out, "Phone: {}", patient.phone)?;
    writeln!(out, "Email: {}", patient.email)?;
    if let Some(last_visit) = patient.last_visit {
        writeln!(out, "Last visit: {}", last_visit)?;
    }
    writeln!(out, "Allergies: {}", list_or_none(&patient.allergies))?;
    writeln!(out, "Conditions: {}", list_or_none(&patient.conditions))
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

fn write_timeline(out: &mut impl Write, entries: &[TimelineEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "No medical records");
    }

    writeln!(out, "Medical Timeline")?;
    for entry in entries {
        let when = match &entry.time {
            Some(time) => format!("{} {}", entry.date, time),
            None => entry.date.clone(),
        };
        writeln!(out)?;
        writeln!(out, "[{}] {} - {}", entry.kind, entry.title, when)?;
        writeln!(out, "  Provider: {}", entry.provider)?;
        match &entry.details {
            DetailsView::Paragraph(text) => writeln!(out, "  {}", text)?,
            DetailsView::Rows(rows) => {
                for row in rows {
                    writeln!(out, "  {}: {}", row.label, row.value)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use healthsync_core::config::OrphanPolicy;
    use healthsync_core::{Fixtures, PatientError};

    fn output_of(run: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        run(&mut buf)?;
        Ok(String::from_utf8(buf).expect("output should be UTF-8"))
    }

    fn lab_draft(patient_id: &str) -> RecordDraft {
        RecordDraft {
            patient_id: patient_id.into(),
            kind: "lab".into(),
            date: "2024-02-01".into(),
            title: "X".into(),
            provider: "Z".into(),
            details_text: Some("y".into()),
            detail_fields: vec![],
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_record_accepts_repeated_fields() {
        let cli = Cli::try_parse_from([
            "healthsync",
            "add-record",
            "--patient",
            "2",
            "--kind",
            "lab",
            "--date",
            "2024-02-01",
            "--title",
            "X",
            "--provider",
            "Z",
            "--field",
            "a=1",
            "--field",
            "b=2",
        ])
        .expect("arguments should parse");

        match cli.command {
            Some(Commands::AddRecord { fields, text, .. }) => {
                assert_eq!(fields, vec!["a=1".to_string(), "b=2".to_string()]);
                assert_eq!(text, None);
            }
            _ => panic!("expected add-record"),
        }
    }

    #[test]
    fn test_add_record_rejects_text_with_fields() {
        let result = Cli::try_parse_from([
            "healthsync",
            "add-record",
            "--patient",
            "2",
            "--kind",
            "lab",
            "--date",
            "2024-02-01",
            "--title",
            "X",
            "--provider",
            "Z",
            "--text",
            "y",
            "--field",
            "a=1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["healthsync", "search", "sarah", "--json"])
            .expect("arguments should parse");
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Some(Commands::Search { query: Some(ref q) }) if q == "sarah"
        ));
    }

    #[test]
    fn test_list_or_none() {
        assert_eq!(list_or_none(&[]), "None");
        assert_eq!(
            list_or_none(&["Peanuts".to_string(), "Shellfish".to_string()]),
            "Peanuts, Shellfish"
        );
    }

    #[test]
    fn test_show_unknown_patient_is_not_found() {
        let mut directory = Directory::seeded();
        let err = output_of(|out| show(&mut directory, "999", false, out))
            .expect_err("unknown patient should fail");

        assert_eq!(err.to_string(), "patient not found: 999");
        assert!(matches!(
            err.downcast_ref::<PatientError>(),
            Some(PatientError::NotFound(_))
        ));
        assert!(directory.current().is_none());
    }

    #[test]
    fn test_show_prints_profile_and_timeline() {
        let mut directory = Directory::seeded();
        let text = output_of(|out| show(&mut directory, "1", false, out))
            .expect("show should succeed");

        assert!(text.starts_with("Sarah Johnson (ID: 1)\n"), "output was: {text}");
        assert!(text.contains("Allergies: Peanuts, Shellfish"));
        assert!(text.contains("[vitals] Routine Vitals Check - Jan 15, 2024"));
        assert!(text.contains("  Bp: 140/90"));
        assert_eq!(directory.current().map(|p| p.id.as_str()), Some("1"));
    }

    #[test]
    fn test_records_without_history_prints_placeholder() {
        let directory = Directory::seeded();
        let text = output_of(|out| records(&directory, "3", false, out))
            .expect("records should succeed");
        assert_eq!(text, "No medical records\n");
    }

    #[test]
    fn test_add_record_prints_updated_timeline() {
        let mut directory = Directory::seeded();
        let text = output_of(|out| add_record(&mut directory, lab_draft("2"), false, out))
            .expect("add-record should succeed");

        assert!(text.starts_with("Added record "), "output was: {text}");
        assert!(text.contains(" for patient 2\n"));
        let newest = text.find("[lab] X - Feb 1, 2024").expect("new record listed");
        let older = text
            .find("[medication] Metformin Prescription - Jan 8, 2024")
            .expect("existing record listed");
        assert!(newest < older, "newest record should come first");
        assert_eq!(directory.records_for("2").len(), 2);
    }

    #[test]
    fn test_add_record_rejected_orphan_leaves_store_unchanged() {
        let mut directory = Directory::from_fixtures(
            CoreConfig::new(FixtureSource::Builtin, OrphanPolicy::Reject),
            Fixtures::builtin(),
        );
        let err = output_of(|out| add_record(&mut directory, lab_draft("99"), false, out))
            .expect_err("orphan should be rejected");

        assert_eq!(err.to_string(), "record references unknown patient: 99");
        assert_eq!(directory.records().len(), 3);
    }

    #[test]
    fn test_add_record_invalid_draft_names_field() {
        let mut directory = Directory::seeded();
        let mut draft = lab_draft("2");
        draft.title = "  ".into();
        let err = output_of(|out| add_record(&mut directory, draft, false, out))
            .expect_err("blank title should fail");
        assert!(matches!(
            err.downcast_ref::<PatientError>(),
            Some(PatientError::ValidationFailure { field: "title", .. })
        ));
    }

    #[test]
    fn test_search_json_lists_matches() {
        let directory = Directory::seeded();
        let text = output_of(|out| search(&directory, Some("chen"), true, out))
            .expect("search should succeed");
        let value: serde_json::Value = serde_json::from_str(&text).expect("output should be JSON");
        let patients = value.as_array().expect("JSON array");
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0]["name"], "Michael Chen");
    }

    #[test]
    fn test_search_without_matches() {
        let directory = Directory::seeded();
        let text = output_of(|out| search(&directory, Some("zzz"), false, out))
            .expect("search should succeed");
        assert_eq!(text, "No patients found.\n");
    }

    #[test]
    fn test_whoami_prints_doctor_license() {
        let text = output_of(|out| whoami("sarah.johnson@email.com", "doctor", false, out))
            .expect("whoami should succeed");
        assert!(text.contains("Name: Sarah Johnson\n"));
        assert!(text.contains("License: MD12345\n"));
        assert!(!text.contains("Lab:"));
    }

    #[test]
    fn test_whoami_rejects_unknown_role() {
        assert!(output_of(|out| whoami("a@b.test", "nurse", false, out)).is_err());
    }
}
