use super::render::{self, FORWARD_HEADERS};
use crate::api::{PorkbunClient, UrlForward};
use crate::cli::UrlCommand;

pub async fn run(command: UrlCommand, client: &PorkbunClient) -> eyre::Result<()> {
    match command {
        UrlCommand::List { domain } => {
            let forwards = client.list_url_forwards(&domain).await?;
            print_forwards(&forwards);
        },
        UrlCommand::Set {
            domain,
            location,
            subdomain,
            redirect,
            wildcard,
            include_path,
        } => {
            let kind = redirect.kind();
            client.add_url_forward(&domain, &subdomain, &location, kind, wildcard, include_path).await?;
            println!("URL forward set successfully.");
        },
        UrlCommand::Delete { domain, id } => {
            client.delete_url_forward(&domain, &id).await?;
            println!("URL forward deleted successfully.");
        },
    }

    Ok(())
}

pub fn print_forwards(forwards: &[UrlForward]) {
    if forwards.is_empty() {
        println!("No forwards found.");
    } else {
        println!("{}", render::table(FORWARD_HEADERS, render::forward_rows(forwards)));
    }
}
