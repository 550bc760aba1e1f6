// gifsynctool/src/sync/transform.rs
use chrono::{DateTime, Utc};

use crate::fetch::Exercise;

/// Normalized row bound for the destination table (columns `id`,
/// `"gifUrl"`, `updated_at`).
#[derive(Debug, Clone, PartialEq)]
pub struct GifRecord {
    pub id: String,
    pub gif_url: String,
    pub updated_at: DateTime<Utc>,
}

/// Maps an API record onto its destination row. Pure; the caller supplies
/// the timestamp so a whole page shares one `updated_at`. No filtering
/// happens here — a record with an empty gif URL passes through as-is.
pub fn to_gif_record(exercise: Exercise, stamped_at: DateTime<Utc>) -> GifRecord {
    GifRecord {
        id: exercise.id,
        gif_url: exercise.gif_url,
        updated_at: stamped_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_gif_record_preserves_id_and_url() {
        let stamped_at = Utc::now();
        let record = to_gif_record(
            Exercise {
                id: "0042".to_string(),
                gif_url: "https://v2.exercisedb.io/image/0042.gif".to_string(),
            },
            stamped_at,
        );

        assert_eq!(record.id, "0042");
        assert_eq!(record.gif_url, "https://v2.exercisedb.io/image/0042.gif");
        assert_eq!(record.updated_at, stamped_at);
    }

    #[test]
    fn test_to_gif_record_passes_empty_url_through() {
        let record = to_gif_record(
            Exercise {
                id: "0099".to_string(),
                gif_url: String::new(),
            },
            Utc::now(),
        );

        assert_eq!(record.id, "0099");
        assert!(record.gif_url.is_empty());
    }
}
