use sea_orm::{EntityTrait, QuerySelect, Select};

use microblog_domain::pagination::PageRequest;

/// Apply a [`PageRequest`] as `OFFSET`/`LIMIT` to a select.
pub trait WithPage {
    fn with_page(self, page: PageRequest) -> Self;
}

impl<E> WithPage for Select<E>
where
    E: EntityTrait,
{
    fn with_page(self, page: PageRequest) -> Self {
        self.offset(page.offset()).limit(page.limit())
    }
}
