//! 计数表.
//!
//! 缺省键的计数视为 0, 只有 [`Tally::bump`] 会插入新键.

use std::collections::BTreeMap;

/// 按键计数, 键有序以保证众数的并列规则确定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K: Ord> {
    counts: BTreeMap<K, u64>,
}

impl<K: Ord> Default for Tally<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 计数加一, 返回加一后的计数
    pub fn bump(&mut self, key: K) -> u64 {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    /// 查询计数, 未出现的键为 0
    pub fn get(&self, key: K) -> u64 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// 出现次数最多的键; 并列时取最小的键
    pub fn mode(&self) -> Option<K> {
        let mut best: Option<(K, u64)> = None;
        for (&key, &count) in &self.counts {
            // 升序遍历, 只在严格更大时替换
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((key, count));
            }
        }
        best.map(|(key, _)| key)
    }

    /// 不同键的数量
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// 所有计数之和
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, u64)> + '_ {
        self.counts.iter().map(|(&key, &count)| (key, count))
    }
}
