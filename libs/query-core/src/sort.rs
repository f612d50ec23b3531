/// Ordering direction for a single sort key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn invert(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// Numeric direction codes: `1` is ascending, every other value descending.
impl From<i32> for SortDir {
    fn from(code: i32) -> Self {
        if code == 1 {
            SortDir::Asc
        } else {
            SortDir::Desc
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub dir: SortDir,
}

/// An ordered list of sort keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortSpec(pub Vec<SortKey>);

impl SortSpec {
    pub fn by(field: impl Into<String>, dir: SortDir) -> Self {
        SortSpec(vec![SortKey {
            field: field.into(),
            dir,
        }])
    }

    pub fn then(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        self.0.push(SortKey {
            field: field.into(),
            dir,
        });
        self
    }

    /// The first sort key, which anchors cursor boundaries.
    pub fn primary(&self) -> Option<&SortKey> {
        self.0.first()
    }

    /// The same keys with every direction flipped. Paging backward queries
    /// the store in this order and re-reverses the rows in memory.
    pub fn invert(&self) -> Self {
        SortSpec(
            self.0
                .iter()
                .map(|k| SortKey {
                    field: k.field.clone(),
                    dir: k.dir.invert(),
                })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
