use std::io::BufRead;

use super::confirm_destructive;
use super::render::{self, RECORD_HEADERS};
use crate::api::{DNSRecord, PorkbunClient, RecordSpec, RecordType, UpsertOutcome};
use crate::cli::{DnsCommand, RecordFields};

impl RecordFields {
    fn spec(self, typ: RecordType, content: String) -> RecordSpec {
        RecordSpec::new(typ, content).name(self.name).prio(self.prio).ttl(self.ttl)
    }
}

pub async fn run(command: DnsCommand, client: &PorkbunClient, input: &mut dyn BufRead) -> eyre::Result<()> {
    match command {
        DnsCommand::List { domain, typ } => {
            let records = client.list_records(&domain).await?;
            print_records(&filter_by_type(records, typ));
        },
        DnsCommand::Create { domain, typ, content, fields } => {
            let id = client.create_record(&domain, &fields.spec(typ, content)).await?;
            println!("Record created successfully (ID: {id}).");
        },
        DnsCommand::Edit { domain, id, typ, content, fields } => {
            client.edit_record(&domain, &id, &fields.spec(typ, content)).await?;
            println!("Record updated successfully.");
        },
        DnsCommand::Delete { domain, id } => {
            println!("Deleting record {id} from {domain}.");
            if !confirm_destructive(input)? {
                println!("Aborted.");
                return Ok(());
            }
            client.delete_record(&domain, &id).await?;
            println!("Record deleted successfully.");
        },
        DnsCommand::Upsert { domain, typ, content, fields } => {
            let outcome = client.upsert_record(&domain, &fields.spec(typ, content)).await?;
            let verb = match outcome {
                UpsertOutcome::Created { .. } => "created",
                UpsertOutcome::Updated { .. } => "updated",
            };
            println!("Record {verb} successfully (ID: {}).", outcome.id());
        },
    }

    Ok(())
}

/// Narrows a record list to one type. Parsing already made the comparison case-insensitive.
pub fn filter_by_type(records: Vec<DNSRecord>, typ: Option<RecordType>) -> Vec<DNSRecord> {
    match typ {
        Some(typ) => records.into_iter().filter(|r| r.typ == typ).collect(),
        None => records,
    }
}

pub fn print_records(records: &[DNSRecord]) {
    if records.is_empty() {
        println!("No records found.");
    } else {
        println!("{}", render::table(RECORD_HEADERS, render::record_rows(records)));
    }
}
