use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// `{"success": true}` acknowledgement returned by mutating endpoints.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct Success {
    pub success: bool,
}

impl Default for Success {
    fn default() -> Self {
        Self { success: true }
    }
}
