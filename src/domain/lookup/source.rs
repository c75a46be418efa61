//! Remote lookup seam

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::NetworkError;
use crate::domain::remedy::LookupPayload;

#[cfg(test)]
use mockall::automock;

/// Which lookup screen a query belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    #[default]
    MateriaMedica,
    Repertory,
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKind::MateriaMedica => write!(f, "materia_medica"),
            LookupKind::Repertory => write!(f, "repertory"),
        }
    }
}

/// Performs exactly one logical remote lookup for a query
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemedySource: Send + Sync + Debug {
    async fn fetch(&self, query: &str) -> Result<LookupPayload, NetworkError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::remedy::RemedyRecord;

    #[test]
    fn test_lookup_kind_display() {
        assert_eq!(LookupKind::MateriaMedica.to_string(), "materia_medica");
        assert_eq!(LookupKind::Repertory.to_string(), "repertory");
    }

    #[tokio::test]
    async fn test_mock_remedy_source() {
        let mut source = MockRemedySource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(LookupPayload::Record(RemedyRecord::named("Sepia"))));

        let payload = source.fetch("sepia").await.unwrap();
        assert_eq!(payload.primary().unwrap().name, "Sepia");
    }
}
