use async_graphql::InputObject;

pub const DEFAULT_PAGE_SIZE: i64 = 12;

#[derive(InputObject)]
pub struct GetItemsInput {
    pub keyword: Option<String>,
    pub page_size: Option<i64>,
    pub page_number: Option<u64>,
}

pub struct Page {
    pub page: u64,
    pub pages: u64,
    pub limit: i64,
    pub skip: u64,
}

/// Clamps the requested page into range. A missing or nonpositive page
/// size falls back to the default; a page number outside `1..=pages`
/// falls back to the first page.
pub fn resolve_page(count: u64, page_size: Option<i64>, page_number: Option<u64>) -> Page {
    let limit = match page_size {
        Some(size) if size >= 1 => size,
        _ => DEFAULT_PAGE_SIZE,
    };

    let pages = count.div_ceil(limit as u64);

    let page = match page_number {
        Some(number) if number >= 1 && number <= pages => number,
        _ => 1,
    };

    Page {
        page,
        pages,
        limit,
        skip: (page - 1) * limit as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_size() {
        let page = resolve_page(30, None, None);

        assert_eq!(page.limit, 12);
        assert_eq!(page.pages, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.skip, 0);
    }

    #[test]
    fn test_nonpositive_page_size_falls_back() {
        let page = resolve_page(30, Some(0), None);

        assert_eq!(page.limit, 12);
    }

    #[test]
    fn test_page_selection() {
        let page = resolve_page(25, Some(10), Some(2));

        assert_eq!(page.pages, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.skip, 10);
    }

    #[test]
    fn test_out_of_range_page_clamps_to_first() {
        let page = resolve_page(25, Some(10), Some(9));

        assert_eq!(page.page, 1);
        assert_eq!(page.skip, 0);

        let page = resolve_page(25, Some(10), Some(0));
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_empty_collection() {
        let page = resolve_page(0, Some(10), Some(1));

        assert_eq!(page.pages, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.skip, 0);
    }

    #[test]
    fn test_exact_multiple() {
        let page = resolve_page(20, Some(10), Some(2));

        assert_eq!(page.pages, 2);
        assert_eq!(page.page, 2);
        assert_eq!(page.skip, 10);
    }
}
