use ogs_derive::ogs_error;

#[ogs_error]
pub enum RosterError {
    #[error("Roster file error: {0}")]
    Io(std::io::Error),
}

fn main() {}
