/// Load a local .env if present; returns whether one was found
pub fn load_dotenv() -> bool {
    dotenv::dotenv().is_ok()
}
