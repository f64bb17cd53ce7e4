use std::future::Future;

use shared_types::AppError;

/// Call `fetch(limit, offset)` with fixed-size pages until a short page
/// arrives, and return every row in order.
pub async fn fetch_all_paged<T, F, Fut>(page_size: i64, mut fetch: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(i64, i64) -> Fut,
    Fut: Future<Output = Result<Vec<T>, AppError>>,
{
    let page_size = page_size.max(1);
    let mut all = Vec::new();
    let mut offset = 0;
    loop {
        let page = fetch(page_size, offset).await?;
        let len = page.len() as i64;
        all.extend(page);
        if len < page_size {
            return Ok(all);
        }
        offset += len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn stops_at_the_short_page() {
        let source: Vec<i64> = (0..23).collect();
        let calls = Cell::new(0);
        let rows = fetch_all_paged(10, |limit, offset| {
            calls.set(calls.get() + 1);
            let page: Vec<i64> = source
                .iter()
                .copied()
                .skip(offset as usize)
                .take(limit as usize)
                .collect();
            async move { Ok(page) }
        })
        .await
        .unwrap();
        assert_eq!(rows, source);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn exact_multiple_needs_one_empty_page() {
        let calls = Cell::new(0);
        let rows = fetch_all_paged(5, |_, offset| {
            calls.set(calls.get() + 1);
            let page: Vec<i64> = if offset < 10 { vec![1; 5] } else { vec![] };
            async move { Ok(page) }
        })
        .await
        .unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn error_aborts() {
        let result: Result<Vec<i64>, _> =
            fetch_all_paged(5, |_, _| async { Err(AppError::backend("boom")) }).await;
        assert!(result.is_err());
    }
}
