use ogs_derive::ogs_error;

#[ogs_error]
pub enum RosterError {
    #[error("Roster file error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<String>,
    },
}

fn main() {}
