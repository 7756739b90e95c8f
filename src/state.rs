use sea_orm::DatabaseConnection;

/// Store handle passed explicitly to every accessor.
#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
}

impl AppState {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}
