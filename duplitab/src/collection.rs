//! A backup collection addressed by its duplicity URL.

use crate::duplicity::Duplicity;
use crate::status::CollectionStatus;
use crate::Result;

/// Backup destination, e.g. `file:///media/backup/a` or
/// `sftp://user@server//media/backup/a`. The URL is passed to duplicity as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    url: String,
    duplicity: Duplicity,
}

impl Collection {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_duplicity(url, Duplicity::default())
    }

    pub fn with_duplicity(url: impl Into<String>, duplicity: Duplicity) -> Self {
        Self {
            url: url.into(),
            duplicity,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run `duplicity collection-status <url>` and parse the report.
    ///
    /// Nothing is cached; every call spawns duplicity again.
    pub fn request_status(&self, timeout_seconds: Option<u64>) -> Result<CollectionStatus> {
        self.duplicity.collection_status(&self.url, timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_init() {
        for url in ["file://media/backup/a", "sftp://user@server//media/backup/阿"] {
            let collection = Collection::new(url);
            assert_eq!(collection.url(), url);
        }
    }

    #[cfg(unix)]
    mod with_fake_duplicity {
        use super::*;
        use crate::duplicity::tests::fake_duplicity;
        use crate::{ChainStatus, DuplitabError};
        use chrono::NaiveDate;

        const MULTIPLE_FULL: &str = r#"
case "$*" in
  "collection-status file://tests/data/collections/empty/multiple-full") ;;
  *) echo "unexpected arguments: $*" >&2; exit 1 ;;
esac
cat <<'REPORT'
Last full backup date: Thu Oct 27 19:57:54 2016
Collection Status
-----------------
Connecting with backend: BackendWrapper
Archive dir: /root/.cache/duplicity/b4ec5fe0b7fec12ee9fac3f4c8dd2f9e

Found 1 secondary backup chain.
Secondary chain 1 of 1:
-------------------------
Chain start time: Thu Oct 27 19:57:40 2016
Chain end time: Thu Oct 27 19:57:40 2016
Number of contained backup sets: 1
Total number of contained volumes: 1
 Type of backup set:                            Time:      Num volumes:
                Full         Thu Oct 27 19:57:40 2016                 1
-------------------------


Found primary backup chain with matching signature chain:
-------------------------
Chain start time: Thu Oct 27 19:57:47 2016
Chain end time: Thu Oct 27 19:57:54 2016
Number of contained backup sets: 2
Total number of contained volumes: 2
 Type of backup set:                            Time:      Num volumes:
                Full         Thu Oct 27 19:57:47 2016                 1
         Incremental         Thu Oct 27 19:57:54 2016                 1
-------------------------
No orphaned or incomplete backup sets found.
REPORT
"#;

        fn at(s: u32) -> chrono::NaiveDateTime {
            NaiveDate::from_ymd_opt(2016, 10, 27)
                .unwrap()
                .and_hms_opt(19, 57, s)
                .unwrap()
        }

        #[test]
        fn test_collection_request_status() {
            let collection = Collection::with_duplicity(
                "file://tests/data/collections/empty/multiple-full",
                fake_duplicity(MULTIPLE_FULL),
            );

            let status = collection.request_status(None).unwrap();
            assert_eq!(
                status.archive_dir_path,
                "/root/.cache/duplicity/b4ec5fe0b7fec12ee9fac3f4c8dd2f9e"
            );

            let chain: &ChainStatus = status.primary_chain.as_ref().unwrap();
            let times: Vec<_> = chain.sets().iter().map(|s| s.backup_time).collect();
            assert_eq!(times, vec![at(47), at(54)]);
            assert_eq!(status.last_full_backup_time(), Some(at(47)));
            assert_eq!(status.last_incremental_backup_time(), Some(at(54)));

            // Same report, same value
            assert_eq!(collection.request_status(None).unwrap(), status);
        }

        #[test]
        fn test_request_status_without_chain() {
            let collection = Collection::with_duplicity(
                "file:///media/backup/empty",
                fake_duplicity(
                    "echo 'Archive dir: /tmp/x'; \
                     echo 'No backup chains with active signatures found'",
                ),
            );
            let status = collection.request_status(Some(10)).unwrap();
            assert_eq!(status.archive_dir_path, "/tmp/x");
            assert_eq!(status.primary_chain, None);
        }

        #[test]
        fn test_request_status_passes_timeout() {
            let collection = Collection::with_duplicity(
                "file:///media/backup/a",
                fake_duplicity(r#"echo "$@" >&2; exit 23"#),
            );
            let err = collection.request_status(Some(3)).unwrap_err();
            assert!(matches!(err, DuplitabError::CommandFailed { status: Some(23), .. }));
            assert_eq!(
                err.output(),
                Some("--timeout 3 collection-status file:///media/backup/a\n")
            );
        }
    }
}
