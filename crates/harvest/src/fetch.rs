use std::future::Future;

/// One page of a cursor-paginated listing. `next_cursor` of `None` means the
/// sequence is exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

/// Drains a cursor-paginated listing into one ordered `Vec`.
///
/// The first call is seeded with a `None` cursor; every later call gets the
/// cursor from the previous page. A page fetch returning `Ok(None)` means the
/// requestor gave up in skip mode; that signal is passed straight to the
/// caller rather than returning the pages gathered so far, so a truncated
/// sequence can never masquerade as a complete one.
pub async fn fetch_all_pages<T, E, F, Fut>(mut fetch_page: F) -> Result<Option<Vec<T>>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Option<Page<T>>, E>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        match fetch_page(cursor.take()).await? {
            None => return Ok(None),
            Some(page) => {
                items.extend(page.items);
                match page.next_cursor {
                    Some(next) => cursor = Some(next),
                    None => return Ok(Some(items)),
                }
            }
        }
    }
}
