use crate::form::DatasetOption;

pub const NONE_LABEL: &str = "None";
pub const NO_DATASETS_LABEL: &str = "No datasets found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSlot {
    Dataset(DatasetOption),
    /// 值为空的选项：清除 dataset 选择
    None,
    /// 检索为空时显示，不可选
    Placeholder,
}

impl DatasetSlot {
    pub fn label(&self) -> String {
        match self {
            DatasetSlot::Dataset(option) => option.label(),
            DatasetSlot::None => NONE_LABEL.to_string(),
            DatasetSlot::Placeholder => NO_DATASETS_LABEL.to_string(),
        }
    }

    pub fn option(&self) -> Option<&DatasetOption> {
        match self {
            DatasetSlot::Dataset(option) => Some(option),
            _ => None,
        }
    }
}

/// dataset 下拉框
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSelect {
    slots: Vec<DatasetSlot>,
    selected: usize,
}

impl Default for DatasetSelect {
    fn default() -> Self {
        Self {
            slots: vec![DatasetSlot::None],
            selected: 0,
        }
    }
}

impl DatasetSelect {
    /// 用新的检索结果整体替换选项；非空时默认选中第一条并在末尾追加 None
    pub fn replace(&mut self, options: Vec<DatasetOption>) {
        self.slots = if options.is_empty() {
            vec![DatasetSlot::Placeholder]
        } else {
            let mut slots: Vec<DatasetSlot> =
                options.into_iter().map(DatasetSlot::Dataset).collect();
            slots.push(DatasetSlot::None);
            slots
        };
        self.selected = 0;
    }

    pub fn slots(&self) -> &[DatasetSlot] {
        &self.slots
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_option(&self) -> Option<&DatasetOption> {
        self.slots.get(self.selected).and_then(DatasetSlot::option)
    }

    /// 占位项不可选；越界返回 false
    pub fn select(&mut self, index: usize) -> bool {
        match self.slots.get(index) {
            Some(DatasetSlot::Placeholder) | None => false,
            Some(_) => {
                self.selected = index;
                true
            }
        }
    }

    pub fn select_none(&mut self) -> bool {
        match self.slots.iter().position(|s| *s == DatasetSlot::None) {
            Some(idx) => self.select(idx),
            None => false,
        }
    }

    pub fn cycle(&mut self, delta: isize) -> bool {
        let len = self.slots.len() as isize;
        let next = (self.selected as isize + delta).rem_euclid(len) as usize;
        self.select(next)
    }

    /// 真实 dataset 选项的个数（不含 None / 占位项）
    pub fn dataset_count(&self) -> usize {
        self.slots.iter().filter(|s| s.option().is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str) -> DatasetOption {
        DatasetOption {
            dataset_id: id.to_string(),
            energy: "1173".to_string(),
            intensity: "99.9".to_string(),
            half_life: "5.27".to_string(),
            half_life_unit: "y".to_string(),
        }
    }

    #[test]
    fn replace_appends_trailing_none() {
        let mut select = DatasetSelect::default();
        select.replace(vec![option("1"), option("2")]);
        assert_eq!(select.slots().len(), 3);
        assert_eq!(select.slots().last(), Some(&DatasetSlot::None));
        assert_eq!(select.selected_option(), Some(&option("1")));
        assert_eq!(select.dataset_count(), 2);
    }

    #[test]
    fn empty_result_shows_unselectable_placeholder() {
        let mut select = DatasetSelect::default();
        select.replace(Vec::new());
        assert_eq!(select.slots(), &[DatasetSlot::Placeholder]);
        assert_eq!(select.selected_option(), None);
        assert!(!select.select(0));
        assert!(!select.select_none());
    }

    #[test]
    fn choosing_none_clears_the_selection() {
        let mut select = DatasetSelect::default();
        select.replace(vec![option("7")]);
        assert!(select.select_none());
        assert_eq!(select.selected_option(), None);
        assert!(select.cycle(1));
        assert_eq!(select.selected_option(), Some(&option("7")));
    }
}
