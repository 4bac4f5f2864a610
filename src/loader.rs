/// 读数文件加载
///
/// 输入为带表头的分隔文本：第一行是字段名，其余每行字段数与表头相同。
/// 必需字段：`hash`、`power`、`rssi`、`time`。
///
/// 加载是一次性的异步操作：要么完整成功并返回有序序列，要么失败且不返回任何数据。

use crate::algorithms::{Aggregator, ExhibitTable, RankedEntry, RankedSequence, Reading};
use crate::error::{RankError, Result};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

/// 字段分隔符
pub const DELIMITER: char = ',';

const FIELD_HASH: &str = "hash";
const FIELD_POWER: &str = "power";
const FIELD_RSSI: &str = "rssi";
const FIELD_TIME: &str = "time";

/// 表头中各必需字段的位置
#[derive(Clone, Debug, PartialEq)]
pub struct RecordLayout {
    hash: usize,
    power: usize,
    rssi: usize,
    time: usize,
    width: usize,
}

impl RecordLayout {
    /// 从表头行解析字段位置，重复的字段名视为格式错误
    pub fn from_header(fields: &[String], line: usize) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = fields.iter().find(|f| !seen.insert(f.as_str())) {
            return Err(RankError::parse(line, format!("表头字段 `{}` 重复", duplicate)));
        }

        let position = |name: &str| {
            fields
                .iter()
                .position(|f| f == name)
                .ok_or_else(|| RankError::parse(line, format!("表头缺少字段 `{}`", name)))
        };

        Ok(RecordLayout {
            hash: position(FIELD_HASH)?,
            power: position(FIELD_POWER)?,
            rssi: position(FIELD_RSSI)?,
            time: position(FIELD_TIME)?,
            width: fields.len(),
        })
    }

    /// 将一行字段转换为读数
    pub fn reading(&self, fields: &[String], line: usize) -> Result<Reading> {
        if fields.len() != self.width {
            return Err(RankError::parse(
                line,
                format!("字段数 {} 与表头 {} 不一致", fields.len(), self.width),
            ));
        }

        let power = parse_number(&fields[self.power], FIELD_POWER, line)?;
        let rssi = parse_number(&fields[self.rssi], FIELD_RSSI, line)?;
        let time_offset = parse_time(&fields[self.time], line)?;

        Ok(Reading::new(fields[self.hash].clone(), power, rssi, time_offset))
    }
}

fn parse_number(raw: &str, name: &str, line: usize) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| RankError::parse(line, format!("字段 `{}` 不是数值: {:?}", name, raw)))
}

/// 解析时间偏移，小数形式截断为整数，超出 i64 范围的数值视为错误
fn parse_time(raw: &str, line: usize) -> Result<i64> {
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(value);
    }
    // i64::MAX as f64 为 2^63，本身已越界
    match raw.parse::<f64>().map(f64::trunc) {
        Ok(value) if value >= i64::MIN as f64 && value < i64::MAX as f64 => Ok(value as i64),
        _ => Err(RankError::parse(
            line,
            format!("字段 `{}` 不是整数: {:?}", FIELD_TIME, raw),
        )),
    }
}

/// 拆分一行分隔文本
///
/// 支持双引号包裹的字段，字段内 `""` 表示一个引号。
/// 未加引号的字段去掉两端空白；加引号的字段保留引号内的原文，忽略引号外的空白。
pub fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    quoted = false;
                }
            }
            '"' if !was_quoted && current.trim().is_empty() => {
                current.clear();
                quoted = true;
                was_quoted = true;
            }
            c if c == DELIMITER && !quoted => {
                fields.push(finish_field(&mut current, was_quoted));
                was_quoted = false;
            }
            c if was_quoted && !quoted && c.is_whitespace() => {}
            c => current.push(c),
        }
    }
    fields.push(finish_field(&mut current, was_quoted));
    fields
}

fn finish_field(current: &mut String, was_quoted: bool) -> String {
    let field = std::mem::take(current);
    if was_quoted {
        field
    } else {
        field.trim().to_string()
    }
}

/// 从异步行读取器加载并完成统计
pub async fn load_from_reader<R>(reader: R, exhibits: &ExhibitTable) -> Result<RankedSequence>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut aggregator = Aggregator::new();
    let mut layout: Option<RecordLayout> = None;
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_record(&line);
        match &layout {
            None => layout = Some(RecordLayout::from_header(&fields, line_no)?),
            Some(layout) => {
                let reading = layout.reading(&fields, line_no)?;
                aggregator.ingest(&reading)?;
            }
        }
    }

    let sequence = aggregator.finalize(exhibits)?;
    info!(
        lines = line_no,
        accepted = aggregator.accepted(),
        discarded = aggregator.discarded(),
        beacons = sequence.len(),
        "readings_loaded"
    );
    Ok(sequence)
}

/// 从文件加载
pub async fn load_path(path: impl AsRef<Path>, exhibits: &ExhibitTable) -> Result<RankedSequence> {
    let file = File::open(path.as_ref()).await?;
    load_from_reader(BufReader::new(file), exhibits).await
}

/// 信标排名器：持有展品映射表与最近一次加载的结果
#[derive(Debug, Default)]
pub struct BeaconRanker {
    exhibits: ExhibitTable,
    data: RankedSequence,
}

impl BeaconRanker {
    pub fn new(exhibits: ExhibitTable) -> Self {
        BeaconRanker {
            exhibits,
            data: RankedSequence::empty(),
        }
    }

    /// 加载文件，成功后替换当前数据
    pub async fn load(&mut self, path: impl AsRef<Path>) -> Result<&RankedSequence> {
        self.data = load_path(path, &self.exhibits).await?;
        Ok(&self.data)
    }

    /// 从任意异步行读取器加载，成功后替换当前数据
    pub async fn load_reader<R>(&mut self, reader: R) -> Result<&RankedSequence>
    where
        R: AsyncBufRead + Unpin,
    {
        self.data = load_from_reader(reader, &self.exhibits).await?;
        Ok(&self.data)
    }

    /// 得分最高的 n 个展品，按时间顺序
    pub fn top(&self, n: usize) -> Result<Vec<RankedEntry>> {
        self.data.top_n(n)
    }

    /// 当前数据（按平均时间升序）
    pub fn data(&self) -> &RankedSequence {
        &self.data
    }

    pub fn exhibits(&self) -> &ExhibitTable {
        &self.exhibits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_plain() {
        assert_eq!(split_record("a, b ,c"), strings(&["a", "b", "c"]));
        assert_eq!(split_record("a,,c"), strings(&["a", "", "c"]));
    }

    #[test]
    fn test_split_quoted() {
        assert_eq!(
            split_record(r#""51496:6493","-60", "a,b""c""#),
            strings(&["51496:6493", "-60", "a,b\"c"])
        );
    }

    #[test]
    fn test_split_quoted_keeps_inner_whitespace() {
        assert_eq!(
            split_record(r#" " A " ,B, "" "#),
            strings(&[" A ", "B", ""])
        );
    }

    #[test]
    fn test_layout_any_column_order() {
        let layout =
            RecordLayout::from_header(&strings(&["time", "rssi", "extra", "hash", "power"]), 1)
                .unwrap();
        let reading = layout
            .reading(&strings(&["120", "-70", "x", "A", "-60"]), 2)
            .unwrap();
        assert_eq!(reading, Reading::new("A", -60.0, -70.0, 120));
    }

    #[test]
    fn test_layout_missing_field() {
        let result = RecordLayout::from_header(&strings(&["hash", "power", "time"]), 1);
        assert!(matches!(result, Err(RankError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_layout_duplicate_field() {
        let result = RecordLayout::from_header(
            &strings(&["hash", "power", "rssi", "time", "rssi"]),
            1,
        );
        assert!(matches!(result, Err(RankError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_reading_errors() {
        let layout =
            RecordLayout::from_header(&strings(&["hash", "power", "rssi", "time"]), 1).unwrap();
        assert!(layout.reading(&strings(&["A", "-60", "-70"]), 3).is_err());
        assert!(layout.reading(&strings(&["A", "loud", "-70", "1"]), 3).is_err());
        assert!(layout.reading(&strings(&["A", "-60", "-70", "soon"]), 3).is_err());
    }

    #[test]
    fn test_time_truncates_decimal() {
        assert_eq!(parse_time("150.9", 1).unwrap(), 150);
        assert_eq!(parse_time("-2.5", 1).unwrap(), -2);
        assert_eq!(parse_time("42", 1).unwrap(), 42);
        assert!(parse_time("inf", 1).is_err());
        assert!(parse_time("1e30", 1).is_err());
        assert!(parse_time("-1e30", 1).is_err());
        assert!(parse_time("9223372036854775808.0", 1).is_err());
        assert_eq!(parse_time("-9223372036854775808.0", 1).unwrap(), i64::MIN);
    }
}
