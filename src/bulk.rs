//! Bulk import and export of DNS records as JSON or CSV.
//!
//! An export file can be fed straight back into an import: JSON exports carry the domain and record IDs, CSV exports
//! only the record fields. Imports additionally understand an `action` column (`create`, `upsert` or `delete`,
//! defaulting to `create`).

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use eyre::{WrapErr, eyre};
use serde::{Deserialize, Serialize};

use crate::api::model::{optional_or_stringified_number, primitive_as_string};
use crate::api::{DNSRecord, PorkbunClient, RecordKind, RecordSpec, RecordType};
use crate::cli::BulkCommand;

/// How many characters of a record's content are shown in import progress lines.
const CONTENT_PREVIEW_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BulkFormat {
    Json,
    Csv,
}

impl BulkFormat {
    /// An explicit choice wins; otherwise `.csv` files are CSV and everything else is JSON.
    pub fn detect(path: &Path, explicit: Option<Self>) -> Self {
        explicit.unwrap_or_else(|| {
            let is_csv = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv { Self::Csv } else { Self::Json }
        })
    }
}

/// What an import should do with one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkAction {
    #[default]
    Create,
    Upsert,
    Delete,
}

impl BulkAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Upsert => "UPSERT",
            Self::Delete => "DELETE",
        }
    }
}

impl Display for BulkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulkAction {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "create" => Ok(Self::Create),
            "upsert" => Ok(Self::Upsert),
            "delete" => Ok(Self::Delete),
            other => Err(eyre!("unknown action '{other}' (expected create, upsert or delete)")),
        }
    }
}

/// One record as it appears in an export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub typ: RecordKind,
    pub name: String,
    pub content: String,
    pub prio: Option<u32>,
    pub ttl: Option<u32>,
}

impl From<&DNSRecord> for ExportRecord {
    fn from(record: &DNSRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            typ: record.typ.clone(),
            name: record.name.clone(),
            content: record.content.clone(),
            prio: record.prio,
            ttl: record.ttl,
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportFile<'a> {
    domain: &'a str,
    records: Vec<ExportRecord>,
}

/// CSV exports leave the ID out.
#[derive(Debug, Serialize)]
struct CsvExportRow<'a> {
    #[serde(rename = "type")]
    typ: &'a str,
    name: &'a str,
    content: &'a str,
    prio: Option<u32>,
    ttl: Option<u32>,
}

pub fn export_json(domain: &str, records: &[DNSRecord]) -> eyre::Result<String> {
    let file = ExportFile {
        domain,
        records: records.iter().map(ExportRecord::from).collect(),
    };
    let mut text = serde_json::to_string_pretty(&file).wrap_err("Failed to serialize records")?;
    text.push('\n');
    Ok(text)
}

/// Writes `type,name,content,prio,ttl` rows. Absent numbers become empty cells.
pub fn export_csv(records: &[DNSRecord]) -> eyre::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer
            .serialize(CsvExportRow {
                typ: record.typ.as_str(),
                name: &record.name,
                content: &record.content,
                prio: record.prio,
                ttl: record.ttl,
            })
            .wrap_err("Failed to serialize records")?;
    }

    // A header is only written along with the first row.
    if records.is_empty() {
        writer.write_record(["type", "name", "content", "prio", "ttl"])?;
    }

    let bytes = writer.into_inner().map_err(|err| eyre!("Failed to finish CSV output: {}", err.error()))?;
    String::from_utf8(bytes).wrap_err("CSV output was not valid UTF-8")
}

/// One line of an import file, before its action has been checked.
#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(default)]
    action: Option<String>,
    #[serde(rename = "type")]
    typ: RecordType,
    #[serde(default)]
    name: String,
    content: String,
    #[serde(default, with = "optional_or_stringified_number")]
    prio: Option<u32>,
    #[serde(default, with = "optional_or_stringified_number")]
    ttl: Option<u32>,
    #[serde(default, with = "primitive_as_string::option")]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImportFile {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    records: Vec<ImportRow>,
}

/// A record to create, upsert or delete. `name` is as written in the file: a subdomain, a fully-qualified name, or
/// empty for the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRecord {
    pub action: BulkAction,
    pub typ: RecordType,
    pub name: String,
    pub content: String,
    pub prio: Option<u32>,
    pub ttl: Option<u32>,
    pub id: Option<String>,
}

impl TryFrom<ImportRow> for BulkRecord {
    type Error = eyre::Report;

    fn try_from(row: ImportRow) -> Result<Self, Self::Error> {
        let action = row.action.as_deref().unwrap_or_default().parse()?;
        Ok(Self {
            action,
            typ: row.typ,
            name: row.name,
            content: row.content,
            prio: row.prio,
            ttl: row.ttl,
            id: row.id,
        })
    }
}

/// The parsed contents of an import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    /// Only JSON files can name their domain.
    pub domain: Option<String>,
    pub records: Vec<BulkRecord>,
}

impl ImportPlan {
    pub fn parse(text: &str, format: BulkFormat) -> eyre::Result<Self> {
        match format {
            BulkFormat::Json => Self::parse_json(text),
            BulkFormat::Csv => Self::parse_csv(text),
        }
    }

    fn parse_json(text: &str) -> eyre::Result<Self> {
        let file: ImportFile = serde_json::from_str(text).wrap_err("Failed to parse JSON import file")?;
        let records = file
            .records
            .into_iter()
            .enumerate()
            .map(|(i, row)| BulkRecord::try_from(row).wrap_err_with(|| format!("Invalid record #{}", i + 1)))
            .collect::<eyre::Result<_>>()?;

        Ok(Self {
            domain: file.domain.filter(|d| !d.is_empty()),
            records,
        })
    }

    fn parse_csv(text: &str) -> eyre::Result<Self> {
        // Rows may leave off trailing optional columns.
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());
        let records = reader
            .deserialize::<ImportRow>()
            .enumerate()
            .map(|(i, row)| {
                let row = row.wrap_err("Failed to parse CSV import file")?;
                BulkRecord::try_from(row).wrap_err_with(|| format!("Invalid record #{}", i + 1))
            })
            .collect::<eyre::Result<_>>()?;

        Ok(Self { domain: None, records })
    }

    /// The domain to import into: the override if there is one, otherwise whatever the file says.
    pub fn target_domain(&self, domain_override: Option<&str>) -> eyre::Result<String> {
        domain_override
            .filter(|d| !d.is_empty())
            .or(self.domain.as_deref())
            .map(String::from)
            .ok_or_else(|| eyre!("Domain must be specified (--domain or in the JSON file)"))
    }
}

/// Turns a record name from an import file into the subdomain Porkbun's write endpoints expect.
///
/// `www.example.com` and `www` both become `www`, and `example.com` becomes the root. A name that merely ends with
/// the domain without a dot in front (such as `myexample.com` for `example.com`) is passed through unchanged.
pub fn resolve_subdomain<'a>(name: &'a str, domain: &str) -> &'a str {
    if name == domain {
        ""
    } else if let Some(sub) = name.strip_suffix(domain).and_then(|rest| rest.strip_suffix('.')) {
        sub
    } else {
        name
    }
}

impl BulkRecord {
    pub fn spec(&self, domain: &str) -> RecordSpec {
        RecordSpec::new(self.typ, self.content.clone())
            .name(Some(resolve_subdomain(&self.name, domain)))
            .prio(self.prio)
            .ttl(self.ttl)
    }

    /// The progress line for the `index`th (one-based) of `total` records.
    pub fn describe(&self, index: usize, total: usize) -> String {
        let name = if self.name.is_empty() { "(root)" } else { &self.name };
        let preview: String = self.content.chars().take(CONTENT_PREVIEW_CHARS).collect();
        format!("[{index}/{total}] {} {} {name} -> {preview}", self.action, self.typ)
    }

    async fn apply(&self, client: &PorkbunClient, domain: &str) -> crate::api::Result<()> {
        match self.action {
            BulkAction::Create => client.create_record(domain, &self.spec(domain)).await.map(drop),
            BulkAction::Upsert => client.upsert_record(domain, &self.spec(domain)).await.map(drop),
            BulkAction::Delete => match self.id.as_deref().filter(|id| !id.is_empty()) {
                Some(id) => client.delete_record(domain, id).await,
                None => {
                    let subdomain = resolve_subdomain(&self.name, domain);
                    client.delete_records_by_name_type(domain, self.typ, Some(subdomain)).await
                },
            },
        }
    }
}

/// The result of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// Runs every record in file order, writing progress to `out` and failures to `err`. A failed record doesn't stop the
/// ones after it. In a dry run nothing is sent to Porkbun at all.
pub async fn execute(
    client: &PorkbunClient,
    domain: &str,
    records: &[BulkRecord],
    dry_run: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<ImportReport> {
    let total = records.len();
    let mut report = ImportReport::default();

    if dry_run {
        writeln!(out, "=== DRY RUN - No changes will be made ===")?;
        for (i, record) in records.iter().enumerate() {
            writeln!(out, "  {}", record.describe(i + 1, total))?;
        }
        writeln!(out, "=== DRY RUN COMPLETE ===")?;
        return Ok(report);
    }

    for (i, record) in records.iter().enumerate() {
        let desc = record.describe(i + 1, total);
        match record.apply(client, domain).await {
            Ok(()) => {
                report.succeeded += 1;
                writeln!(out, "  OK: {desc}")?;
            },
            Err(e) => {
                report.failed += 1;
                log::debug!("Import of record {} failed: {e:?}", i + 1);
                writeln!(err, "  FAIL: {desc} - {e}")?;
            },
        }
    }

    writeln!(out, "\nComplete: {} succeeded, {} failed", report.succeeded, report.failed)?;
    Ok(report)
}

/// Exports a domain's records to a file, or to stdout when `output` is `None`.
pub async fn export_to(
    client: &PorkbunClient,
    domain: &str,
    format: BulkFormat,
    output: Option<&Path>,
) -> eyre::Result<()> {
    let records = client.list_records(domain).await?;
    let text = match format {
        BulkFormat::Json => export_json(domain, &records)?,
        BulkFormat::Csv => export_csv(&records)?,
    };

    match output {
        Some(path) => {
            tokio::fs::write(path, text)
                .await
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} records to {}", records.len(), path.display());
        },
        None => print!("{text}"),
    }
    Ok(())
}

/// Reads an import file and applies it. Returns an error only when the file or its domain is unusable; failed records
/// are reported along the way.
pub async fn import_from(
    client: &PorkbunClient,
    file: &Path,
    domain_override: Option<&str>,
    format: Option<BulkFormat>,
    dry_run: bool,
) -> eyre::Result<ImportReport> {
    let text = tokio::fs::read_to_string(file)
        .await
        .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
    let plan = ImportPlan::parse(&text, BulkFormat::detect(file, format))?;
    let domain = plan.target_domain(domain_override)?;

    println!("Importing {} records to {domain}", plan.records.len());
    let report = execute(client, &domain, &plan.records, dry_run, &mut io::stdout(), &mut io::stderr()).await?;
    Ok(report)
}

pub async fn run(command: BulkCommand, client: &PorkbunClient) -> eyre::Result<()> {
    match command {
        BulkCommand::Export { domain, format, output } => export_to(client, &domain, format, output.as_deref()).await,
        BulkCommand::Import { file, domain, format, dry_run } => {
            import_from(client, &file, domain.as_deref(), format, dry_run).await.map(drop)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakePorkbun;

    fn example_zone() -> FakePorkbun {
        let dmarc = format!("v=DMARC1; p=none; rua=mailto:{}@example.com", "x".repeat(80));
        FakePorkbun::new()
            .with_domain("example.com")
            .with_record_detail("example.com", RecordType::A, "example.com", "1.2.3.4", None, Some(600))
            .with_record_detail("example.com", RecordType::A, "www.example.com", "1.2.3.4", None, Some(600))
            .with_record_detail("example.com", RecordType::MX, "example.com", "mail.example.com", Some(10), Some(3600))
            .with_record("example.com", RecordType::TXT, "_dmarc.example.com", &dmarc)
    }

    async fn run_quietly(
        client: &PorkbunClient,
        domain: &str,
        records: &[BulkRecord],
        dry_run: bool,
    ) -> (ImportReport, String, String) {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let report = execute(client, domain, records, dry_run, &mut out, &mut err).await.unwrap();
        (report, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn csv_rows_become_create_records() {
        let text = "type,name,content,prio,ttl\nA,www,1.2.3.4,,300\nMX,,mail.example.com,10,3600\n";
        let plan = ImportPlan::parse(text, BulkFormat::Csv).unwrap();

        assert_eq!(plan.domain, None);
        assert_eq!(plan.records, [
            BulkRecord {
                action: BulkAction::Create,
                typ: RecordType::A,
                name: "www".into(),
                content: "1.2.3.4".into(),
                prio: None,
                ttl: Some(300),
                id: None,
            },
            BulkRecord {
                action: BulkAction::Create,
                typ: RecordType::MX,
                name: String::new(),
                content: "mail.example.com".into(),
                prio: Some(10),
                ttl: Some(3600),
                id: None,
            },
        ]);
    }

    #[test]
    fn short_csv_rows_leave_trailing_fields_empty() {
        let text = "type,name,content,prio,ttl\nA,www,1.2.3.4\nMX,,mail.example.com,10,3600\n";
        let plan = ImportPlan::parse(text, BulkFormat::Csv).unwrap();

        assert_eq!(plan.records.len(), 2);
        let short = &plan.records[0];
        assert_eq!((short.typ, short.name.as_str(), short.content.as_str()), (RecordType::A, "www", "1.2.3.4"));
        assert_eq!((short.prio, short.ttl), (None, None));
        assert_eq!((plan.records[1].prio, plan.records[1].ttl), (Some(10), Some(3600)));
    }

    #[test]
    fn csv_needs_a_domain_from_somewhere() {
        let plan = ImportPlan::parse("type,name,content\nA,www,1.2.3.4\n", BulkFormat::Csv).unwrap();
        assert!(plan.target_domain(None).is_err());
        assert_eq!(plan.target_domain(Some("example.com")).unwrap(), "example.com");
    }

    #[test]
    fn csv_actions_and_ids_are_optional_columns() {
        let text = "action,type,name,content,id\nupsert,A,www,1.2.3.4,\nDELETE,TXT,old,x,12345\n,CNAME,blog,example.net,\n";
        let plan = ImportPlan::parse(text, BulkFormat::Csv).unwrap();

        let actions: Vec<BulkAction> = plan.records.iter().map(|r| r.action).collect();
        assert_eq!(actions, [BulkAction::Upsert, BulkAction::Delete, BulkAction::Create]);
        assert_eq!(plan.records[0].id, None);
        assert_eq!(plan.records[1].id.as_deref(), Some("12345"));
    }

    #[test]
    fn unknown_actions_reject_the_whole_file() {
        let text = r#"{ "domain": "example.com", "records": [
            { "type": "A", "content": "1.2.3.4" },
            { "action": "replace", "type": "A", "content": "5.6.7.8" }
        ] }"#;
        let err = ImportPlan::parse(text, BulkFormat::Json).unwrap_err();
        assert!(format!("{err:#}").contains("record #2"));
    }

    #[test]
    fn json_numbers_may_be_strings_or_null() {
        let text = r#"{ "domain": "example.com", "records": [
            { "type": "MX", "name": "", "content": "mail.example.com", "prio": "10", "ttl": null, "id": 987 }
        ] }"#;
        let plan = ImportPlan::parse(text, BulkFormat::Json).unwrap();

        assert_eq!(plan.target_domain(None).unwrap(), "example.com");
        assert_eq!(plan.target_domain(Some("example.org")).unwrap(), "example.org");
        let record = &plan.records[0];
        assert_eq!((record.prio, record.ttl), (Some(10), None));
        assert_eq!(record.id.as_deref(), Some("987"));
    }

    #[test]
    fn format_detection() {
        assert_eq!(BulkFormat::detect(Path::new("records.csv"), None), BulkFormat::Csv);
        assert_eq!(BulkFormat::detect(Path::new("RECORDS.CSV"), None), BulkFormat::Csv);
        assert_eq!(BulkFormat::detect(Path::new("records.json"), None), BulkFormat::Json);
        assert_eq!(BulkFormat::detect(Path::new("records"), None), BulkFormat::Json);
        assert_eq!(BulkFormat::detect(Path::new("records.txt"), Some(BulkFormat::Csv)), BulkFormat::Csv);
    }

    #[test]
    fn subdomain_resolution() {
        assert_eq!(resolve_subdomain("www.example.com", "example.com"), "www");
        assert_eq!(resolve_subdomain("a.b.example.com", "example.com"), "a.b");
        assert_eq!(resolve_subdomain("example.com", "example.com"), "");
        assert_eq!(resolve_subdomain("www", "example.com"), "www");
        assert_eq!(resolve_subdomain("", "example.com"), "");
        // Not a subdomain of example.com, so it is left alone.
        assert_eq!(resolve_subdomain("myexample.com", "example.com"), "myexample.com");
    }

    #[test]
    fn descriptions_preview_the_content() {
        let record = BulkRecord {
            action: BulkAction::Upsert,
            typ: RecordType::TXT,
            name: String::new(),
            content: "v=spf1 include:_spf.example.net include:_spf.example.org -all".into(),
            prio: None,
            ttl: None,
            id: None,
        };
        assert_eq!(record.describe(2, 5), "[2/5] UPSERT TXT (root) -> v=spf1 include:_spf.example.n");
    }

    #[test]
    fn exports_keep_every_field() {
        let records = vec![DNSRecord {
            id: "1".into(),
            name: "www.example.com".into(),
            typ: RecordType::TXT.into(),
            content: "z".repeat(120),
            ttl: None,
            prio: Some(0),
            notes: None,
        }];

        let json: serde_json::Value = serde_json::from_str(&export_json("example.com", &records).unwrap()).unwrap();
        assert_eq!(json["domain"], "example.com");
        assert_eq!(json["records"][0]["id"], "1");
        assert_eq!(json["records"][0]["content"].as_str().unwrap().len(), 120);
        assert_eq!(json["records"][0]["prio"], 0);
        assert!(json["records"][0]["ttl"].is_null());

        let csv = export_csv(&records).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("type,name,content,prio,ttl"));
        assert_eq!(lines.next(), Some(format!("TXT,www.example.com,{},0,", "z".repeat(120)).as_str()));
    }

    #[test]
    fn apex_record_without_numbers_exports_empty_cells() {
        let records = vec![DNSRecord {
            id: "1".into(),
            name: "example.com".into(),
            typ: RecordType::A.into(),
            content: "1.2.3.4".into(),
            ttl: None,
            prio: None,
            notes: None,
        }];
        assert_eq!(export_csv(&records).unwrap(), "type,name,content,prio,ttl\nA,example.com,1.2.3.4,,\n");
    }

    #[test]
    fn unfamiliar_types_are_exported_by_name() {
        let records = vec![DNSRecord {
            id: "7".into(),
            name: "example.com".into(),
            typ: RecordKind::Other("SOA".into()),
            content: "ns1.porkbun.com".into(),
            ttl: None,
            prio: None,
            notes: None,
        }];

        assert_eq!(export_csv(&records).unwrap(), "type,name,content,prio,ttl\nSOA,example.com,ns1.porkbun.com,,\n");
        let json: serde_json::Value = serde_json::from_str(&export_json("example.com", &records).unwrap()).unwrap();
        assert_eq!(json["records"][0]["type"], "SOA");
    }

    #[test]
    fn empty_csv_exports_still_have_a_header() {
        assert_eq!(export_csv(&[]).unwrap(), "type,name,content,prio,ttl\n");
    }

    #[tokio::test]
    async fn dry_run_lists_everything_and_changes_nothing() {
        let fake = example_zone();
        let client = fake.client();
        let records = client.list_records("example.com").await.unwrap();
        let plan = ImportPlan::parse(&export_json("example.com", &records).unwrap(), BulkFormat::Json).unwrap();
        let before = fake.calls().len();

        let (report, out, err) = run_quietly(&client, "example.com", &plan.records, true).await;

        assert_eq!(fake.calls().len(), before);
        assert_eq!(report, ImportReport::default());
        assert!(err.is_empty());
        assert!(out.starts_with("=== DRY RUN"));
        assert!(out.trim_end().ends_with("=== DRY RUN COMPLETE ==="));

        let total = plan.records.len();
        let planned: Vec<&str> = out.lines().filter(|line| line.starts_with("  [")).collect();
        assert_eq!(planned.len(), total);
        for (i, (line, record)) in planned.iter().zip(&plan.records).enumerate() {
            assert_eq!(*line, format!("  {}", record.describe(i + 1, total)));
        }
    }

    #[tokio::test]
    async fn re_importing_an_export_as_upserts_changes_nothing() {
        let fake = example_zone();
        let client = fake.client();
        let before = fake.records("example.com");

        let text = export_json("example.com", &before).unwrap();
        let mut plan = ImportPlan::parse(&text, BulkFormat::Json).unwrap();
        for record in &mut plan.records {
            record.action = BulkAction::Upsert;
        }
        let domain = plan.target_domain(None).unwrap();

        let (report, _, err) = run_quietly(&client, &domain, &plan.records, false).await;

        assert_eq!(report.succeeded, before.len());
        assert_eq!(report.failed, 0);
        assert!(err.is_empty());
        assert_eq!(fake.records("example.com"), before);
        assert!(fake.endpoints().iter().all(|e| !e.starts_with("dns/create")));
    }

    #[tokio::test]
    async fn failures_are_reported_and_the_rest_still_run() {
        let fake = FakePorkbun::new().with_domain("example.com");
        let client = fake.client();
        let text = "action,type,name,content,id\n\
                    create,A,www,1.2.3.4,\n\
                    delete,A,gone,,999\n\
                    create,AAAA,www.example.com,::1,\n";
        let plan = ImportPlan::parse(text, BulkFormat::Csv).unwrap();

        let (report, out, err) = run_quietly(&client, "example.com", &plan.records, false).await;

        assert_eq!(report, ImportReport { succeeded: 2, failed: 1 });
        assert!(out.contains("  OK: [1/3] CREATE A www -> 1.2.3.4"));
        assert!(out.contains("  OK: [3/3] CREATE AAAA www.example.com -> ::1"));
        assert!(err.contains("  FAIL: [2/3] DELETE A gone -> "));
        assert!(out.contains("Complete: 2 succeeded, 1 failed"));

        let names: Vec<String> = fake.records("example.com").into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["www.example.com", "www.example.com"]);
    }

    #[tokio::test]
    async fn deletes_without_an_id_go_by_name_and_type() {
        let fake = example_zone();
        let client = fake.client();
        let plan = ImportPlan::parse("action,type,name,content\ndelete,A,www.example.com,\n", BulkFormat::Csv).unwrap();

        run_quietly(&client, "example.com", &plan.records, false).await;

        assert!(fake.endpoints().contains(&"dns/deleteByNameType/example.com/A/www".to_string()));
        let remaining = fake.records("example.com");
        assert!(!remaining.iter().any(|r| r.typ == RecordType::A && r.name == "www.example.com"));
        assert!(remaining.iter().any(|r| r.typ == RecordType::A && r.name == "example.com"));
    }

    #[tokio::test]
    async fn import_file_round_trip_through_disk() {
        let fake = FakePorkbun::new().with_domain("example.com");
        let client = fake.client();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        std::fs::write(&path, "type,name,content,prio,ttl\nA,www,1.2.3.4,,300\n").unwrap();

        let report = import_from(&client, &path, Some("example.com"), None, false).await.unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(fake.records("example.com")[0].ttl, Some(300));

        assert!(import_from(&client, &path, None, None, false).await.is_err());
        assert!(import_from(&client, &dir.path().join("missing.json"), None, None, false).await.is_err());
    }
}
