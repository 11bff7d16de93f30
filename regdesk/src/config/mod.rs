//! Desk configuration loading.
//!
//! Everything the desk needs from its deployment lives in one YAML file,
//! every section optional:
//! ```yaml
//! event:
//!   weekday: wednesday        # mon..sun / monday..sunday
//!   time: "09:00"             # local time, HH:MM or HH:MM:SS
//!   same_day: next_week       # next_week | later_today
//! email:
//!   endpoint: "https://api.emailjs.com/api/v1.0/email/send"
//!   service_id: "service_xxx"
//!   template_id: "template_xxx"
//!   public_key: "pk_xxx"
//!   timeout_secs: 30          # 0 disables the request timeout
//! form:
//!   fields:
//!     - name: name
//!       param: from_name
//!     - name: challenges
//!       required_when: { field: has_project, equals: "yes" }
//!     - name: department
//!       optional: true
//! ```
//!
//! Email credentials are then overridden from the environment
//! (`REGDESK_EMAILJS_*`), so secrets need not be written to the file.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{NaiveTime, Weekday};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::countdown::{SameDayPolicy, WeeklySchedule};
use crate::registration::{FieldSpec, FormSchema, Requirement};

pub const DEFAULT_EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_ENDPOINT: &str = "REGDESK_EMAILJS_ENDPOINT";
pub const ENV_SERVICE_ID: &str = "REGDESK_EMAILJS_SERVICE_ID";
pub const ENV_TEMPLATE_ID: &str = "REGDESK_EMAILJS_TEMPLATE_ID";
pub const ENV_PUBLIC_KEY: &str = "REGDESK_EMAILJS_PUBLIC_KEY";

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeskConfigFile {
    #[serde(default)]
    event: Option<EventEntry>,
    #[serde(default)]
    email: Option<EmailEntry>,
    #[serde(default)]
    form: Option<FormEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventEntry {
    weekday: Option<String>,
    time: Option<String>,
    #[serde(default)]
    same_day: SameDayEntry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SameDayEntry {
    #[default]
    NextWeek,
    LaterToday,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EmailEntry {
    endpoint: Option<String>,
    #[serde(default)]
    service_id: String,
    #[serde(default)]
    template_id: String,
    #[serde(default)]
    public_key: String,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FormEntry {
    fields: Vec<FieldEntry>,
}

/// One form field.  `param` defaults to `name`; a field is required unless
/// `optional` or `required_when` says otherwise.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldEntry {
    name: String,
    param: Option<String>,
    #[serde(default)]
    optional: bool,
    required_when: Option<WhenEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WhenEntry {
    field: String,
    equals: String,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Credentials and transport settings for the email-delivery API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    /// Whole-request timeout.  `None` leaves the HTTP client default (none).
    pub timeout: Option<Duration>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_EMAILJS_ENDPOINT.to_string(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl EmailConfig {
    /// Override fields from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override fields from `lookup` (an environment-like key → value source).
    /// Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let targets: [(&str, &mut String); 4] = [
            (ENV_ENDPOINT, &mut self.endpoint),
            (ENV_SERVICE_ID, &mut self.service_id),
            (ENV_TEMPLATE_ID, &mut self.template_id),
            (ENV_PUBLIC_KEY, &mut self.public_key),
        ];
        for (key, target) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                debug!(key, "email setting overridden from environment");
                *target = value;
            }
        }
    }

    /// `true` when every credential is non-blank.
    pub fn has_credentials(&self) -> bool {
        [&self.service_id, &self.template_id, &self.public_key]
            .iter()
            .all(|v| !v.trim().is_empty())
    }
}

/// Complete desk configuration.
#[derive(Debug, Clone, Default)]
pub struct DeskConfig {
    pub event: WeeklySchedule,
    pub email: EmailConfig,
    pub form: FormSchema,
}

impl DeskConfig {
    /// Parse `path`.  Missing sections fall back to their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is structurally
    /// invalid, or a value (weekday, time, form schema) is not understood.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading desk configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))
    }

    /// Parse a YAML document.  An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: DeskConfigFile = if content.trim().is_empty() {
            DeskConfigFile::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };

        let event = match file.event {
            Some(entry) => parse_event(entry)?,
            None => WeeklySchedule::default(),
        };

        let email = match file.email {
            Some(entry) => EmailConfig {
                endpoint: entry
                    .endpoint
                    .unwrap_or_else(|| DEFAULT_EMAILJS_ENDPOINT.to_string()),
                service_id: entry.service_id,
                template_id: entry.template_id,
                public_key: entry.public_key,
                timeout: match entry.timeout_secs {
                    Some(0) => None,
                    Some(secs) => Some(Duration::from_secs(secs)),
                    None => Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
                },
            },
            None => EmailConfig::default(),
        };

        let form = match file.form {
            Some(entry) => parse_form(entry)?,
            None => FormSchema::default(),
        };

        info!(
            weekday = %event.weekday,
            time = %event.time,
            same_day = ?event.same_day,
            fields = form.fields().len(),
            "Desk configuration loaded"
        );

        Ok(Self { event, email, form })
    }
}

// ── Conversion helpers ────────────────────────────────────────────────────────

fn parse_event(entry: EventEntry) -> Result<WeeklySchedule> {
    let defaults = WeeklySchedule::default();

    let weekday = match entry.weekday {
        Some(s) => parse_weekday(&s)?,
        None => defaults.weekday,
    };
    let time = match entry.time {
        Some(s) => parse_time(&s)?,
        None => defaults.time,
    };
    let same_day = match entry.same_day {
        SameDayEntry::NextWeek => SameDayPolicy::NextWeek,
        SameDayEntry::LaterToday => SameDayPolicy::LaterToday,
    };

    Ok(WeeklySchedule::new(weekday, time).with_same_day_policy(same_day))
}

fn parse_weekday(s: &str) -> Result<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| anyhow::anyhow!("invalid weekday '{s}' (expected e.g. 'wed' or 'wednesday')"))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .with_context(|| format!("invalid event time '{s}' (expected HH:MM or HH:MM:SS)"))
}

fn parse_form(entry: FormEntry) -> Result<FormSchema> {
    if entry.fields.is_empty() {
        warn!("Form section declares no fields, every record will validate");
    }

    let mut specs = Vec::with_capacity(entry.fields.len());
    for field in entry.fields {
        let requirement = match (field.optional, field.required_when) {
            (true, Some(_)) => bail!(
                "field '{}' cannot be both optional and required_when",
                field.name
            ),
            (true, None) => Requirement::Optional,
            (false, Some(when)) => Requirement::When {
                field: when.field,
                equals: when.equals,
            },
            (false, None) => Requirement::Always,
        };
        let param = field.param.unwrap_or_else(|| field.name.clone());
        debug!(name = %field.name, %param, ?requirement, "  form field");
        specs.push(FieldSpec {
            name: field.name,
            param,
            requirement,
        });
    }

    Ok(FormSchema::try_new(specs)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::registration::RegistrationRecord;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn empty_file_yields_defaults() {
        let f = yaml_tempfile("");
        let cfg = DeskConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.event, WeeklySchedule::default());
        assert_eq!(cfg.event.weekday, Weekday::Wed);
        assert_eq!(cfg.event.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(cfg.email, EmailConfig::default());
        assert_eq!(cfg.email.endpoint, DEFAULT_EMAILJS_ENDPOINT);
        assert_eq!(cfg.form.fields().len(), FormSchema::default().fields().len());
    }

    // ── Full file ─────────────────────────────────────────────────────────────

    #[test]
    fn load_full_file() {
        let yaml = r#"
event:
  weekday: friday
  time: "18:30"
  same_day: later_today
email:
  endpoint: "http://localhost:8080/send"
  service_id: "service_abc"
  template_id: "template_def"
  public_key: "pk_123"
  timeout_secs: 5
form:
  fields:
    - name: name
      param: from_name
    - name: has_project
    - name: challenges
      required_when: { field: has_project, equals: "yes" }
    - name: newsletter
      optional: true
"#;
        let f = yaml_tempfile(yaml);
        let cfg = DeskConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.event.weekday, Weekday::Fri);
        assert_eq!(cfg.event.time, NaiveTime::from_hms_opt(18, 30, 0).unwrap());
        assert_eq!(cfg.event.same_day, SameDayPolicy::LaterToday);

        assert_eq!(cfg.email.endpoint, "http://localhost:8080/send");
        assert_eq!(cfg.email.service_id, "service_abc");
        assert_eq!(cfg.email.template_id, "template_def");
        assert_eq!(cfg.email.public_key, "pk_123");
        assert_eq!(cfg.email.timeout, Some(Duration::from_secs(5)));
        assert!(cfg.email.has_credentials());

        let names: Vec<_> = cfg.form.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "has_project", "challenges", "newsletter"]);
        assert_eq!(cfg.form.field("name").unwrap().param, "from_name");
        assert_eq!(cfg.form.field("has_project").unwrap().param, "has_project");
        assert!(matches!(
            cfg.form.field("newsletter").unwrap().requirement,
            Requirement::Optional
        ));

        // The parsed schema behaves like a hand-built one.
        let record = RegistrationRecord::new()
            .with_field("name", "Ada")
            .with_field("has_project", "yes");
        let err = cfg.form.validate(&record).unwrap_err();
        assert_eq!(err.missing, vec!["challenges".to_string()]);
    }

    #[test]
    fn zero_timeout_disables_it() {
        let cfg = DeskConfig::from_yaml_str("email:\n  timeout_secs: 0\n").unwrap();
        assert_eq!(cfg.email.timeout, None);
    }

    #[test]
    fn short_weekday_and_seconds_are_accepted() {
        let cfg = DeskConfig::from_yaml_str("event:\n  weekday: Mon\n  time: \"07:15:30\"\n").unwrap();
        assert_eq!(cfg.event.weekday, Weekday::Mon);
        assert_eq!(cfg.event.time, NaiveTime::from_hms_opt(7, 15, 30).unwrap());
        assert_eq!(cfg.event.same_day, SameDayPolicy::NextWeek);
    }

    // ── Errors ────────────────────────────────────────────────────────────────

    #[test]
    fn missing_file_returns_error() {
        let result = DeskConfig::load_from_file(Path::new("/nonexistent/path/regdesk.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(DeskConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn unknown_key_returns_error() {
        assert!(DeskConfig::from_yaml_str("evnt:\n  weekday: wed\n").is_err());
    }

    #[test]
    fn invalid_weekday_returns_error() {
        let err = DeskConfig::from_yaml_str("event:\n  weekday: someday\n").unwrap_err();
        assert!(format!("{err:#}").contains("someday"));
    }

    #[test]
    fn invalid_time_returns_error() {
        assert!(DeskConfig::from_yaml_str("event:\n  time: \"25:00\"\n").is_err());
        assert!(DeskConfig::from_yaml_str("event:\n  time: \"nine\"\n").is_err());
    }

    #[test]
    fn optional_and_required_when_conflict() {
        let yaml = r#"
form:
  fields:
    - name: a
    - name: b
      optional: true
      required_when: { field: a, equals: "x" }
"#;
        assert!(DeskConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn condition_on_undeclared_field_returns_error() {
        let yaml = r#"
form:
  fields:
    - name: challenges
      required_when: { field: has_project, equals: "yes" }
"#;
        let err = DeskConfig::from_yaml_str(yaml).unwrap_err();
        assert!(format!("{err:#}").contains("has_project"));
    }

    // ── Environment overrides ─────────────────────────────────────────────────

    #[test]
    fn overrides_replace_file_values() {
        let mut email = EmailConfig {
            service_id: "from_file".into(),
            ..EmailConfig::default()
        };
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_SERVICE_ID, "service_env"),
            (ENV_TEMPLATE_ID, "template_env"),
            (ENV_PUBLIC_KEY, "pk_env"),
        ]);
        email.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(email.service_id, "service_env");
        assert_eq!(email.template_id, "template_env");
        assert_eq!(email.public_key, "pk_env");
        assert_eq!(email.endpoint, DEFAULT_EMAILJS_ENDPOINT);
        assert!(email.has_credentials());
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut email = EmailConfig {
            public_key: "pk_file".into(),
            ..EmailConfig::default()
        };
        email.apply_overrides(|k| (k == ENV_PUBLIC_KEY).then(|| "  ".to_string()));
        assert_eq!(email.public_key, "pk_file");
        assert!(!email.has_credentials());
    }
}
