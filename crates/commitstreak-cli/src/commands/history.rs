use commitstreak_core::Config;

use super::open_database;

pub fn run(limit: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_database(&Config::resolve()?)?;
    let records = db.history(limit)?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
