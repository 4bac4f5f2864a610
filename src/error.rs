/// 错误类型定义
///
/// 所有错误对当前操作都是终止性的：不重试，也不返回部分结果。

use thiserror::Error;

/// 加载与排名过程中的错误
#[derive(Debug, Error)]
pub enum RankError {
    /// 数据源在读取途中报告 I/O 错误
    #[error("数据源读取失败: {0}")]
    Transport(#[from] std::io::Error),

    /// 表头或数据行格式错误
    #[error("第 {line} 行解析失败: {reason}")]
    Parse { line: usize, reason: String },

    /// top(n) 请求的数量为 0 或超过已有条目数
    #[error("数据不足: 请求 {requested} 条, 仅有 {available} 条")]
    InvalidRankRequest { requested: usize, available: usize },

    /// 信标标识在展品映射表中不存在
    #[error("信标 {0} 没有对应的展品编号")]
    UnmappedIdentity(String),

    /// 调用顺序错误（例如 finalize 之后继续 ingest）
    #[error("调用顺序错误: {0}")]
    Misuse(&'static str),
}

impl RankError {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        RankError::Parse {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RankError>;
