//! Catalog item types
//!
//! One record type per category, plus [`StageTask`] which is selected inside
//! the task picker. Selection state is never a field of these records; it
//! lives in [`crate::SelectionSet`].

use crate::date::{self, TaskDate};
use crate::error::TaskSpanError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{
    serde_as, DeserializeFromStr, DisplayFromStr, PickFirst, SerializeDisplay, TryFromInto,
};
use std::fmt;
use std::str::FromStr;

/// A record that can be listed and chosen in a [`crate::SelectionSet`]
pub trait CatalogItem: Clone + fmt::Debug + Send + Sync + 'static {
    /// Document identifier, unique within its collection
    fn identifier(&self) -> &str;

    /// Key stored by persisted compositions (name, title or stage name)
    fn selection_key(&self) -> &str;

    /// Ordered label/value pairs for list display
    fn display_fields(&self) -> Vec<(&'static str, String)>;
}

/// Location, soil or weather entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagItem {
    /// Document identifier
    pub id: String,
    /// Display name, also the key in persisted compositions
    pub name: String,
}

impl TagItem {
    /// Create tag item
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl CatalogItem for TagItem {
    fn identifier(&self) -> &str {
        &self.id
    }

    fn selection_key(&self) -> &str {
        &self.name
    }

    fn display_fields(&self) -> Vec<(&'static str, String)> {
        vec![("name", self.name.clone())]
    }
}

/// Planting location
pub type Location = TagItem;
/// Soil type
pub type Soil = TagItem;
/// Weather condition
pub type Weather = TagItem;

/// Priced material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Document identifier
    pub id: String,
    /// Display title, also the key in persisted compositions
    pub title: String,
    /// Unit price
    pub price: Decimal,
    /// Amount per planting
    pub quantity: Decimal,
    /// Unit of `quantity`
    pub unit: String,
}

impl Ingredient {
    /// Create ingredient
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        price: Decimal,
        quantity: Decimal,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            quantity,
            unit: unit.into(),
        }
    }
}

impl CatalogItem for Ingredient {
    fn identifier(&self) -> &str {
        &self.id
    }

    fn selection_key(&self) -> &str {
        &self.title
    }

    fn display_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("price", self.price.to_string()),
            ("quantity", self.quantity.to_string()),
            ("unit", self.unit.clone()),
        ]
    }
}

/// Dated task attached to a stage
///
/// `durationDays` is derived from the dates and recomputed whenever a task is
/// constructed or decoded; stored values are ignored.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStageTask")]
pub struct StageTask {
    id: String,
    #[serde(rename = "task")]
    label: String,
    #[serde(rename = "repeat")]
    #[serde_as(serialize_as = "DisplayFromStr")]
    repeat_interval_days: u32,
    #[serde(rename = "days")]
    #[serde_as(serialize_as = "DisplayFromStr")]
    duration_days: u32,
    #[serde(rename = "startDate")]
    start_date: TaskDate,
    #[serde(rename = "endDate")]
    end_date: TaskDate,
}

impl StageTask {
    /// Create task, deriving its duration
    ///
    /// # Errors
    /// [`TaskSpanError`] if `end_date` precedes `start_date`
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        repeat_interval_days: u32,
        start_date: TaskDate,
        end_date: TaskDate,
    ) -> Result<Self, TaskSpanError> {
        let id = id.into();
        let days = start_date.days_until(&end_date);
        if days < 0 {
            return Err(TaskSpanError {
                id,
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }

        Ok(Self {
            id,
            label: label.into(),
            repeat_interval_days,
            duration_days: u32::try_from(days).unwrap_or(u32::MAX),
            start_date,
            end_date,
        })
    }

    /// Task identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Task label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Repeat interval in days
    #[inline]
    #[must_use]
    pub fn repeat_interval_days(&self) -> u32 {
        self.repeat_interval_days
    }

    /// Days between start and end
    #[inline]
    #[must_use]
    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    /// First day
    #[inline]
    #[must_use]
    pub fn start_date(&self) -> TaskDate {
        self.start_date
    }

    /// Last day
    #[inline]
    #[must_use]
    pub fn end_date(&self) -> TaskDate {
        self.end_date
    }
}

impl CatalogItem for StageTask {
    fn identifier(&self) -> &str {
        &self.id
    }

    fn selection_key(&self) -> &str {
        &self.label
    }

    fn display_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("task", self.label.clone()),
            ("repeat", self.repeat_interval_days.to_string()),
            ("days", self.duration_days.to_string()),
            ("startDate", self.start_date.to_string()),
            ("endDate", self.end_date.to_string()),
        ]
    }
}

// Counts are written as strings; older documents hold plain numbers
#[serde_as]
#[derive(Deserialize)]
struct RawStageTask {
    id: String,
    task: String,
    #[serde_as(deserialize_as = "PickFirst<(DisplayFromStr, _)>")]
    repeat: u32,
    #[serde(rename = "startDate")]
    start_date: TaskDate,
    #[serde(rename = "endDate")]
    end_date: TaskDate,
}

impl TryFrom<RawStageTask> for StageTask {
    type Error = TaskSpanError;

    fn try_from(raw: RawStageTask) -> Result<Self, Self::Error> {
        StageTask::new(raw.id, raw.task, raw.repeat, raw.start_date, raw.end_date)
    }
}

/// Growing period of a stage, stored as `"1"`, `"2"` or `"3"`
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub enum Period {
    /// Period 1
    #[default]
    First,
    /// Period 2
    Second,
    /// Period 3
    Third,
}

impl Period {
    /// Numeric value as stored
    #[inline]
    #[must_use]
    pub fn value(&self) -> u8 {
        match self {
            Period::First => 1,
            Period::Second => 2,
            Period::Third => 3,
        }
    }
}

impl TryFrom<u8> for Period {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Period::First),
            2 => Ok(Period::Second),
            3 => Ok(Period::Third),
            other => Err(format!("period must be 1, 2 or 3, got {other}")),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid period: {s:?}"))?;
        Period::try_from(value)
    }
}

/// Derived `[start, end]` interval of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpan {
    /// Earliest task start
    pub start: TaskDate,
    /// Latest task end
    pub end: TaskDate,
}

impl StageSpan {
    /// Span over a task list: earliest start, latest end
    ///
    /// Compares integer day indexes. Returns `None` for an empty list.
    pub fn from_tasks<'a, I>(tasks: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a StageTask>,
    {
        tasks.into_iter().fold(None, |span, task| {
            let (start, end) = (task.start_date(), task.end_date());
            Some(match span {
                None => StageSpan { start, end },
                Some(current) => StageSpan {
                    start: if start.day_index() < current.start.day_index() {
                        start
                    } else {
                        current.start
                    },
                    end: if end.day_index() > current.end.day_index() {
                        end
                    } else {
                        current.end
                    },
                },
            })
        })
    }

    /// Days covered by the span
    #[inline]
    #[must_use]
    pub fn length_days(&self) -> i64 {
        self.start.days_until(&self.end)
    }
}

/// Growth stage with its ordered task list
///
/// The span is always derived from the tasks, both on construction and when
/// decoded; a stage without tasks has no span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawStage")]
pub struct Stage {
    id: String,
    #[serde(rename = "stageName")]
    stage_name: String,
    period: Period,
    #[serde(rename = "startDate", with = "date::optional")]
    start_date: Option<TaskDate>,
    #[serde(rename = "endDate", with = "date::optional")]
    end_date: Option<TaskDate>,
    tasks: Vec<StageTask>,
}

impl Stage {
    /// Create stage, deriving its span from `tasks`
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        stage_name: impl Into<String>,
        period: Period,
        tasks: Vec<StageTask>,
    ) -> Self {
        let span = StageSpan::from_tasks(&tasks);
        Self {
            id: id.into(),
            stage_name: stage_name.into(),
            period,
            start_date: span.map(|s| s.start),
            end_date: span.map(|s| s.end),
            tasks,
        }
    }

    /// Stage identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Stage name
    #[inline]
    #[must_use]
    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }

    /// Growing period
    #[inline]
    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    /// Ordered tasks
    #[inline]
    #[must_use]
    pub fn tasks(&self) -> &[StageTask] {
        &self.tasks
    }

    /// Derived span, `None` when there are no tasks
    #[must_use]
    pub fn span(&self) -> Option<StageSpan> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(StageSpan { start, end }),
            _ => None,
        }
    }
}

impl CatalogItem for Stage {
    fn identifier(&self) -> &str {
        &self.id
    }

    fn selection_key(&self) -> &str {
        &self.stage_name
    }

    fn display_fields(&self) -> Vec<(&'static str, String)> {
        let date_text = |d: Option<TaskDate>| d.map(|d| d.to_string()).unwrap_or_default();
        vec![
            ("stageName", self.stage_name.clone()),
            ("period", self.period.to_string()),
            ("startDate", date_text(self.start_date)),
            ("endDate", date_text(self.end_date)),
            ("tasks", self.tasks.len().to_string()),
        ]
    }
}

#[serde_as]
#[derive(Deserialize)]
struct RawStage {
    id: String,
    #[serde(rename = "stageName")]
    stage_name: String,
    #[serde(default)]
    #[serde_as(deserialize_as = "PickFirst<(_, TryFromInto<u8>)>")]
    period: Period,
    #[serde(default)]
    tasks: Vec<StageTask>,
}

impl From<RawStage> for Stage {
    fn from(raw: RawStage) -> Self {
        Stage::new(raw.id, raw.stage_name, raw.period, raw.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn day(index: i64) -> TaskDate {
        TaskDate::from_day_index(index).unwrap()
    }

    fn task(id: &str, start: i64, end: i64) -> StageTask {
        StageTask::new(id, format!("task {id}"), 1, day(start), day(end)).unwrap()
    }

    #[test]
    fn task_duration_is_derived() {
        let t = task("t1", 3, 10);
        assert_eq!(t.duration_days(), 7);
    }

    #[test]
    fn task_rejects_inverted_dates() {
        let err = StageTask::new("t1", "water", 1, day(5), day(4)).unwrap_err();
        assert_eq!(err.id, "t1");
    }

    #[test]
    fn task_decoding_ignores_stored_days() {
        let decoded: StageTask = serde_json::from_value(json!({
            "id": "t1",
            "task": "weed",
            "repeat": "2",
            "days": "99",
            "startDate": "1970-01-02",
            "endDate": "1970-01-05"
        }))
        .unwrap();
        assert_eq!(decoded.duration_days(), 3);
        assert_eq!(decoded.repeat_interval_days(), 2);
    }

    #[test]
    fn task_wire_shape() {
        let value = serde_json::to_value(task("t1", 0, 2)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "t1",
                "task": "task t1",
                "repeat": "1",
                "days": "2",
                "startDate": "1970-01-01",
                "endDate": "1970-01-03"
            })
        );
    }

    #[test]
    fn span_is_min_start_max_end() {
        let tasks = vec![task("a", 3, 5), task("b", 1, 4)];
        let span = StageSpan::from_tasks(&tasks).unwrap();
        assert_eq!(span.start, day(1));
        assert_eq!(span.end, day(5));
        assert_eq!(span.length_days(), 4);
        assert!(StageSpan::from_tasks(&[]).is_none());
    }

    #[test]
    fn stage_span_recomputed_on_decode() {
        let stage: Stage = serde_json::from_value(json!({
            "id": "s1",
            "stageName": "Seedling",
            "period": 2,
            "startDate": "2000-01-01",
            "endDate": "2000-01-01",
            "tasks": [
                {"id": "t1", "task": "a", "repeat": "1", "days": "0",
                 "startDate": "5", "endDate": "8"}
            ]
        }))
        .unwrap();
        assert_eq!(stage.period(), Period::Second);
        assert_eq!(stage.span().unwrap().start, day(5));
        assert_eq!(stage.span().unwrap().end, day(8));
    }

    #[test]
    fn empty_stage_writes_blank_span() {
        let stage = Stage::new("s1", "Empty", Period::First, vec![]);
        let value = serde_json::to_value(&stage).unwrap();
        assert_eq!(value["startDate"], "");
        assert_eq!(value["endDate"], "");
        assert_eq!(value["period"], "1");
        assert!(stage.span().is_none());
    }

    #[test]
    fn period_rejects_out_of_range() {
        assert!(serde_json::from_value::<Period>(json!("4")).is_err());
        assert_eq!(serde_json::from_value::<Period>(json!("3")).unwrap(), Period::Third);
    }

    #[test]
    fn task_repeat_accepts_legacy_number() {
        let decoded: StageTask = serde_json::from_value(json!({
            "id": "t1", "task": "weed", "repeat": 3,
            "startDate": "1970-01-02", "endDate": "1970-01-05"
        }))
        .unwrap();
        assert_eq!(decoded.repeat_interval_days(), 3);
        assert_eq!(serde_json::to_value(&decoded).unwrap()["repeat"], "3");
    }

    #[test]
    fn task_rejects_non_numeric_repeat() {
        let result = serde_json::from_value::<StageTask>(json!({
            "id": "t1", "task": "weed", "repeat": "often",
            "startDate": "1970-01-02", "endDate": "1970-01-05"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn stage_rejects_period_out_of_range() {
        let result = serde_json::from_value::<Stage>(json!({
            "id": "s1", "stageName": "Late", "period": 7, "tasks": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn ingredient_keeps_exact_prices() {
        let float: Ingredient = serde_json::from_value(json!({
            "id": "i1", "title": "Urea", "price": 0.1 + 0.2, "quantity": 1, "unit": "kg"
        }))
        .unwrap();
        assert!(float.price > Decimal::new(3, 1));

        let precise: Ingredient = serde_json::from_value(json!({
            "id": "i2", "title": "Lime", "price": "1.23456", "quantity": "1", "unit": "kg"
        }))
        .unwrap();
        assert_eq!(precise.price, Decimal::new(123_456, 5));
        assert_eq!(serde_json::to_value(&precise).unwrap()["price"], "1.23456");
    }

    #[test]
    fn ingredient_rejects_non_numeric_price() {
        let result = serde_json::from_value::<Ingredient>(json!({
            "id": "i1", "title": "Urea", "price": "cheap", "quantity": "1", "unit": "kg"
        }));
        assert!(result.is_err());
    }
}
