use crate::error::{StoreError, StoreResult};
use crate::object::{ListPage, ListRequest, ObjectEntry};

/// Cut one listing page out of a key-ordered sequence of entries.
///
/// `entries` must be sorted by key. Backends that hold their whole namespace
/// locally use this to answer [`ListRequest`]s with bucket semantics: prefix
/// filtering, delimiter roll-up, marker continuation, and truncation.
pub fn paginate<I>(entries: I, request: &ListRequest) -> StoreResult<ListPage>
where
    I: IntoIterator<Item = ObjectEntry>,
{
    if request.max_keys == 0 {
        return Err(StoreError::InvalidRequest("max_keys must be positive".into()));
    }

    let mut page = ListPage::default();
    let mut last_name: Option<String> = None;
    let mut count = 0usize;

    for entry in entries {
        if !entry.key.starts_with(&request.prefix) {
            continue;
        }

        let rolled_up = common_prefix(&entry.key, &request.prefix, &request.delimiter);
        let name = rolled_up.as_deref().unwrap_or(&entry.key);

        if let Some(ref marker) = request.marker {
            if name <= marker.as_str() {
                continue;
            }
        }
        if rolled_up.is_some() && last_name.as_deref() == Some(name) {
            continue;
        }
        if count == request.max_keys {
            page.is_truncated = true;
            break;
        }
        count += 1;

        last_name = Some(name.to_string());
        match rolled_up {
            Some(prefix) => page.common_prefixes.push(prefix),
            None => page.entries.push(entry),
        }
    }

    if page.is_truncated {
        page.next_marker = last_name;
    }
    Ok(page)
}

/// The rolled-up prefix for `key`, if the delimiter occurs after `prefix`.
fn common_prefix(key: &str, prefix: &str, delimiter: &str) -> Option<String> {
    if delimiter.is_empty() {
        return None;
    }
    let rest = &key[prefix.len()..];
    rest.find(delimiter)
        .map(|at| key[..prefix.len() + at + delimiter.len()].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(keys: &[&str]) -> Vec<ObjectEntry> {
        keys.iter().map(|k| ObjectEntry::new(*k, "m", 1)).collect()
    }

    fn keys(page: &ListPage) -> Vec<&str> {
        page.entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn single_page_when_everything_fits() {
        let page = paginate(entries(&["a", "b", "c"]), &ListRequest::new("")).unwrap();
        assert_eq!(keys(&page), vec!["a", "b", "c"]);
        assert!(!page.is_truncated);
        assert!(page.next_marker.is_none());
    }

    #[test]
    fn prefix_filters_keys() {
        let page = paginate(
            entries(&["img/1", "logs/1", "logs/2", "zz"]),
            &ListRequest::new("logs/"),
        )
        .unwrap();
        assert_eq!(keys(&page), vec!["logs/1", "logs/2"]);
    }

    #[test]
    fn truncates_at_max_keys() {
        let all = entries(&["a", "b", "c", "d", "e"]);
        let page = paginate(all.clone(), &ListRequest::new("").with_max_keys(2)).unwrap();
        assert_eq!(keys(&page), vec!["a", "b"]);
        assert!(page.is_truncated);
        assert_eq!(page.next_marker.as_deref(), Some("b"));

        let next = paginate(all, &ListRequest::new("").with_max_keys(2).with_marker("b")).unwrap();
        assert_eq!(keys(&next), vec!["c", "d"]);
        assert!(next.is_truncated);
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        let page = paginate(entries(&["a", "b"]), &ListRequest::new("").with_max_keys(2)).unwrap();
        assert_eq!(page.entries.len(), 2);
        assert!(!page.is_truncated);
    }

    #[test]
    fn marker_past_end_yields_empty_page() {
        let page = paginate(entries(&["a", "b"]), &ListRequest::new("").with_marker("b")).unwrap();
        assert!(page.entries.is_empty());
        assert!(!page.is_truncated);
    }

    #[test]
    fn delimiter_rolls_up_common_prefixes() {
        let request = ListRequest::new("").with_delimiter("/");
        let page = paginate(entries(&["a/1", "a/2", "b", "c/x/y"]), &request).unwrap();
        assert_eq!(keys(&page), vec!["b"]);
        assert_eq!(page.common_prefixes, vec!["a/".to_string(), "c/".to_string()]);
    }

    #[test]
    fn common_prefix_counts_once_and_is_skipped_after_marker() {
        let all = entries(&["a/1", "a/2", "a/3", "b", "c"]);
        let request = ListRequest::new("").with_delimiter("/").with_max_keys(2);
        let page = paginate(all.clone(), &request).unwrap();
        assert_eq!(page.common_prefixes, vec!["a/".to_string()]);
        assert_eq!(keys(&page), vec!["b"]);
        assert!(page.is_truncated);
        assert_eq!(page.next_marker.as_deref(), Some("b"));

        let next = paginate(all, &request.clone().with_marker("a/")).unwrap();
        assert!(next.common_prefixes.is_empty());
        assert_eq!(keys(&next), vec!["b", "c"]);
    }

    #[test]
    fn zero_max_keys_is_rejected() {
        let err = paginate(entries(&["a"]), &ListRequest::new("").with_max_keys(0)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRequest(_)));
    }
}
