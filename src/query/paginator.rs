use serde::Serialize;

/// 默认每页文章数
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// 查询窗口（偏移量 + 条数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

impl Window {
    /// 只取序列中的第一条
    pub const FIRST: Window = Window {
        offset: 0,
        limit: 1,
    };
}

/// 分页元信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// 当前页码，从 1 开始
    pub number: u32,
    pub num_pages: u32,
    /// 过滤后的总条数
    pub count: u64,
    pub page_size: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page_number: Option<u32>,
    pub next_page_number: Option<u32>,
}

impl PageMeta {
    /// 当前页对应的查询窗口
    pub fn window(&self) -> Window {
        Window {
            offset: u64::from(self.number - 1) * u64::from(self.page_size),
            limit: u64::from(self.page_size),
        }
    }

    /// 当前页第一条在序列中的序号（从 1 开始），空序列为 0
    pub fn start_index(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            self.window().offset + 1
        }
    }
}

/// 固定页大小的分页器
///
/// 页码越界时就近取第一页或最后一页，不返回错误；空序列也有一页（空页）。
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_size: u32,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn num_pages(&self, count: u64) -> u32 {
        let pages = count.div_ceil(u64::from(self.page_size)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// 计算 `requested` 页的元信息，越界页码被钳制到 `[1, num_pages]`
    pub fn page(&self, count: u64, requested: i64) -> PageMeta {
        let num_pages = self.num_pages(count);
        let number = requested.clamp(1, i64::from(num_pages)) as u32;
        let has_previous = number > 1;
        let has_next = number < num_pages;

        PageMeta {
            number,
            num_pages,
            count,
            page_size: self.page_size,
            has_previous,
            has_next,
            previous_page_number: has_previous.then(|| number - 1),
            next_page_number: has_next.then(|| number + 1),
        }
    }
}

/// 宽松解析页码参数：缺失或不是整数时视为第 1 页
pub fn parse_page_number(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(1)
}
