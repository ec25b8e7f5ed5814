//! Bulk importers for delimited book and student files.
//!
//! Both importers share a policy: a bad row never aborts the batch, it adds
//! one row-numbered message and the rest proceed. They differ in commit
//! behavior: books commit per row; students parse per row but insert as a
//! single all-or-nothing batch.

use std::path::Path;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        identity::{Identity, Role},
        import::ImportOutcome,
    },
    repository::Repository,
    services::catalog::CatalogService,
};

/// Column indices resolved from a book file's header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BookColumns {
    title: usize,
    author: usize,
    location: usize,
    copies: usize,
    genre: Option<usize>,
}

/// Drop a leading UTF-8 byte-order mark if present.
fn strip_bom(s: &str) -> &str {
    s.strip_prefix('\u{feff}').unwrap_or(s)
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

/// Map a header row to column indices. Title, author, location and
/// copy-count are required; the genre column is optional and accepted under
/// either spelling.
fn parse_book_header(line: &str) -> Option<BookColumns> {
    let mut title = None;
    let mut author = None;
    let mut location = None;
    let mut copies = None;
    let mut genre = None;

    for (idx, cell) in split_fields(line).iter().enumerate() {
        match cell.to_lowercase().as_str() {
            "title" => title = Some(idx),
            "author" => author = Some(idx),
            "location" | "room" => location = Some(idx),
            "copies" | "count" | "total_copies" => copies = Some(idx),
            "genre" | "category" => genre = Some(idx),
            _ => {}
        }
    }

    Some(BookColumns {
        title: title?,
        author: author?,
        location: location?,
        copies: copies?,
        genre,
    })
}

/// Whether a student file's first row looks like a header rather than data.
fn is_student_header(line: &str) -> bool {
    const LABELS: &[&str] = &[
        "last",
        "first",
        "lastname",
        "firstname",
        "last_name",
        "first_name",
        "name",
        "student",
    ];

    let cells = split_fields(line);
    !cells.is_empty()
        && cells
            .iter()
            .all(|c| LABELS.contains(&c.to_lowercase().as_str()))
}

/// Parse one student row into (first_name, last_name).
///
/// Accepts both encodings: two fields (`last, first`) and a single quoted
/// field with an embedded comma (`"last,first"`). Splits on the first comma
/// only and trims each part.
fn parse_student_row(line: &str) -> Result<(String, String), String> {
    let trimmed = line.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);

    if unquoted.trim().is_empty() {
        return Err("empty row".to_string());
    }

    match unquoted.matches(',').count() {
        0 => return Err("expected 'last_name, first_name'".to_string()),
        1 => {}
        _ => return Err("too many fields".to_string()),
    }

    // Count said there is exactly one comma.
    let (last, first) = unquoted.split_once(',').unwrap_or((unquoted, ""));
    let last = last.trim();
    let first = first.trim();

    if last.is_empty() {
        return Err("last name is empty".to_string());
    }
    if first.is_empty() {
        return Err("first name is empty".to_string());
    }

    Ok((first.to_string(), last.to_string()))
}

#[derive(Clone)]
pub struct ImportService {
    repository: Repository,
    catalog: CatalogService,
}

impl ImportService {
    pub fn new(repository: Repository, catalog: CatalogService) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    /// Import books from a delimited file on disk. An unreadable file
    /// aborts with a single error and zero successes.
    pub async fn import_books(&self, path: impl AsRef<Path>) -> AppResult<ImportOutcome> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => self.import_books_from_str(&contents).await,
            Err(e) => Ok(ImportOutcome::failed(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Import books from file contents. Rows are committed one by one; a
    /// rejected row records its number and the batch continues. A bad
    /// copy-count is a warning, not a rejection: the row imports with the
    /// count forced to 1.
    pub async fn import_books_from_str(&self, contents: &str) -> AppResult<ImportOutcome> {
        let contents = strip_bom(contents);

        let mut rows = contents.lines().enumerate();
        let header = rows.by_ref().find(|(_, line)| !line.trim().is_empty());

        let Some((_, header_line)) = header else {
            return Ok(ImportOutcome::failed("file is empty".to_string()));
        };
        let Some(columns) = parse_book_header(header_line) else {
            return Ok(ImportOutcome::failed(
                "missing or unrecognized header row".to_string(),
            ));
        };

        let mut outcome = ImportOutcome::default();

        for (idx, line) in rows {
            let row = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let cells = split_fields(line);
            let field = |i: usize| cells.get(i).copied().unwrap_or("");

            let title = field(columns.title);
            let author = field(columns.author);
            let location = field(columns.location);
            let copies_raw = field(columns.copies);

            let missing = [
                ("title", title),
                ("author", author),
                ("location", location),
                ("copy count", copies_raw),
            ]
            .iter()
            .find(|(_, value)| value.is_empty())
            .map(|(name, _)| *name);

            if let Some(name) = missing {
                outcome.errors.push(format!("row {}: {} is empty", row, name));
                continue;
            }

            let copies = match copies_raw.parse::<i64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    outcome.errors.push(format!(
                        "row {}: invalid copy count '{}', defaulting to 1",
                        row, copies_raw
                    ));
                    1
                }
            };

            let genre = columns.genre.map(field).filter(|g| !g.is_empty());

            self.catalog
                .add(title, author, location, genre, copies)
                .await?;
            outcome.success_count += 1;
        }

        tracing::info!(
            imported = outcome.success_count,
            rejected = outcome.errors.len(),
            "book import finished"
        );
        Ok(outcome)
    }

    /// Import students from a delimited file on disk into `group_tag`.
    pub async fn import_students(
        &self,
        path: impl AsRef<Path>,
        group_tag: &str,
    ) -> AppResult<ImportOutcome> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => self.import_students_from_str(&contents, group_tag).await,
            Err(e) => Ok(ImportOutcome::failed(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Import students from file contents into `group_tag`.
    ///
    /// Validation is per row, but the insert is a single all-or-nothing
    /// transaction: a storage fault during the batch reports zero successes
    /// even for rows that parsed cleanly. Imported students get the student
    /// role and no credential.
    pub async fn import_students_from_str(
        &self,
        contents: &str,
        group_tag: &str,
    ) -> AppResult<ImportOutcome> {
        let contents = strip_bom(contents);

        let mut outcome = ImportOutcome::default();
        let mut parsed = Vec::new();

        for (idx, line) in contents.lines().enumerate() {
            let row = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            if row == 1 && is_student_header(line) {
                continue;
            }

            match parse_student_row(line) {
                Ok((first, last)) => parsed.push(Identity {
                    id: Uuid::new_v4(),
                    display_name: format!("{} {}", first, last),
                    group_tag: group_tag.to_string(),
                    role: Role::Student,
                    password_salt: None,
                    password_hash: None,
                    points: 0,
                }),
                Err(reason) => outcome.errors.push(format!("row {}: {}", row, reason)),
            }
        }

        if !parsed.is_empty() {
            if let Err(e) = self.repository.identities.insert_batch(&parsed).await {
                tracing::error!(error = %e, "student batch insert failed");
                outcome
                    .errors
                    .push(format!("batch insert failed, no rows imported: {}", e));
                outcome.success_count = 0;
                return Ok(outcome);
            }
            outcome.success_count = parsed.len();
        }

        tracing::info!(
            imported = outcome.success_count,
            rejected = outcome.errors.len(),
            group_tag,
            "student import finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_header_resolves_columns() {
        let columns = parse_book_header("Title,Author,Genre,Location,Copies").unwrap();
        assert_eq!(
            columns,
            BookColumns {
                title: 0,
                author: 1,
                location: 3,
                copies: 4,
                genre: Some(2),
            }
        );
    }

    #[test]
    fn book_header_accepts_alternate_labels() {
        let columns = parse_book_header("title,author,room,total_copies,category").unwrap();
        assert_eq!(columns.location, 2);
        assert_eq!(columns.copies, 3);
        assert_eq!(columns.genre, Some(4));
    }

    #[test]
    fn book_header_requires_all_four() {
        assert!(parse_book_header("title,author,genre").is_none());
        assert!(parse_book_header("not,a,header,at,all").is_none());
    }

    #[test]
    fn student_row_accepts_both_encodings() {
        assert_eq!(
            parse_student_row("Doe, Jane"),
            Ok(("Jane".to_string(), "Doe".to_string()))
        );
        assert_eq!(
            parse_student_row("\"Doe,Jane\""),
            Ok(("Jane".to_string(), "Doe".to_string()))
        );
    }

    #[test]
    fn student_row_rejects_bad_shapes() {
        assert!(parse_student_row("").is_err());
        assert!(parse_student_row("Doe").is_err());
        assert!(parse_student_row("Doe,Jane,extra").is_err());
        assert!(parse_student_row("Doe,").is_err());
        assert!(parse_student_row(", Jane").is_err());
    }

    #[test]
    fn bom_is_tolerated() {
        assert_eq!(strip_bom("\u{feff}title"), "title");
        assert_eq!(strip_bom("title"), "title");
    }

    #[test]
    fn student_header_detection() {
        assert!(is_student_header("last_name,first_name"));
        assert!(is_student_header("Last, First"));
        assert!(!is_student_header("Doe, Jane"));
    }
}
