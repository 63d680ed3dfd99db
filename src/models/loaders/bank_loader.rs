//! 题库加载器
//!
//! 把用户提供的表格文件（Excel/CSV）解析为 [`QuestionBank`]。
//! 列名由配置指定，缺列在加载阶段立即报错，绝不等到模型调用之后。

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{debug, info, warn};

use crate::error::{AppResult, BankError};
use crate::models::question::{QuestionBank, QuestionRecord};

/// 从表格文件加载题库
///
/// # 参数
/// - `path`: 题库文件路径，按扩展名区分 CSV 与 Excel
/// - `question_column`: 题目列的列名
/// - `answer_column`: 答案列的列名
///
/// # 返回
/// 返回按行序排列的 [`QuestionBank`]，题目单元格为空的行会被跳过
pub fn load_bank(
    path: &str,
    question_column: &str,
    answer_column: &str,
) -> AppResult<QuestionBank> {
    let file_path = Path::new(path);
    if !file_path.exists() {
        return Err(BankError::NotFound {
            path: path.to_string(),
        }
        .into());
    }

    let extension = file_path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    let records = match extension.as_str() {
        "csv" => load_csv(path, question_column, answer_column)?,
        "xlsx" | "xls" => load_excel(path, question_column, answer_column)?,
        _ => {
            return Err(BankError::UnsupportedFormat {
                path: path.to_string(),
                extension,
            }
            .into());
        }
    };

    if records.is_empty() {
        return Err(BankError::EmptyBank {
            path: path.to_string(),
        }
        .into());
    }

    info!("✓ 已加载 {} 道题目到内存", records.len());

    Ok(QuestionBank::new(records, path))
}

/// 加载 CSV 题库
fn load_csv(
    path: &str,
    question_column: &str,
    answer_column: &str,
) -> AppResult<Vec<QuestionRecord>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| BankError::ReadFailed {
        path: path.to_string(),
        source: Box::new(e),
    })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| BankError::ReadFailed {
            path: path.to_string(),
            source: Box::new(e),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let q_idx = find_column(&headers, question_column)?;
    let a_idx = find_column(&headers, answer_column)?;

    let mut records = Vec::new();
    for (row_num, row) in reader.records().enumerate() {
        let row = row.map_err(|e| BankError::ReadFailed {
            path: path.to_string(),
            source: Box::new(e),
        })?;

        let question = row.get(q_idx).unwrap_or_default().trim().to_string();
        if question.is_empty() {
            debug!("跳过第 {} 行：题目单元格为空", row_num + 2);
            continue;
        }
        let answer = row.get(a_idx).unwrap_or_default().trim().to_string();

        records.push(QuestionRecord {
            question_text: question,
            answer_text: answer,
        });
    }

    Ok(records)
}

/// 加载 Excel 题库（取第一个工作表，首行为表头）
fn load_excel(
    path: &str,
    question_column: &str,
    answer_column: &str,
) -> AppResult<Vec<QuestionRecord>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| BankError::ReadFailed {
        path: path.to_string(),
        source: Box::new(e),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| BankError::EmptyBank {
            path: path.to_string(),
        })?
        .map_err(|e| BankError::ReadFailed {
            path: path.to_string(),
            source: Box::new(e),
        })?;

    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_to_string(cell).trim().to_string())
            .collect(),
        None => {
            return Err(BankError::EmptyBank {
                path: path.to_string(),
            }
            .into());
        }
    };

    let q_idx = find_column(&headers, question_column)?;
    let a_idx = find_column(&headers, answer_column)?;

    let mut records = Vec::new();
    for (row_num, row) in rows.enumerate() {
        let question = row
            .get(q_idx)
            .map(cell_to_string)
            .unwrap_or_default()
            .trim()
            .to_string();
        if question.is_empty() {
            debug!("跳过第 {} 行：题目单元格为空", row_num + 2);
            continue;
        }
        let answer = row
            .get(a_idx)
            .map(cell_to_string)
            .unwrap_or_default()
            .trim()
            .to_string();
        if answer.is_empty() {
            warn!("第 {} 行的答案单元格为空", row_num + 2);
        }

        records.push(QuestionRecord {
            question_text: question,
            answer_text: answer,
        });
    }

    Ok(records)
}

/// 在表头中查找列名（大小写敏感，与原始表格约定一致）
fn find_column(headers: &[String], column: &str) -> Result<usize, BankError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| BankError::ColumnNotFound {
            column: column.to_string(),
            available: headers.to_vec(),
        })
}

/// 把 Excel 单元格转为字符串
///
/// 整数值的浮点单元格（Excel 默认把数字存成 f64）不带小数点输出
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::io::Write;

    fn write_csv(content: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let path = path.to_string_lossy().to_string();
        (dir, path)
    }

    #[test]
    fn test_load_csv_bank() {
        let (_dir, path) = write_csv("Question,Answer\nWhat is 2+2?,4\nCapital of France?,Paris\n");
        let bank = load_bank(&path, "Question", "Answer").unwrap();

        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get(0).unwrap().answer_text, "4");
        assert_eq!(bank.get(1).unwrap().question_text, "Capital of France?");
    }

    #[test]
    fn test_column_not_found() {
        let (_dir, path) = write_csv("Q,A\nWhat is 2+2?,4\n");
        let err = load_bank(&path, "Question", "Answer").unwrap_err();

        match err {
            AppError::Bank(BankError::ColumnNotFound { column, available }) => {
                assert_eq!(column, "Question");
                assert_eq!(available, vec!["Q".to_string(), "A".to_string()]);
            }
            other => panic!("期望 ColumnNotFound，实际: {:?}", other),
        }
    }

    #[test]
    fn test_blank_question_rows_skipped() {
        let (_dir, path) = write_csv("Question,Answer\nWhat is 2+2?,4\n  ,orphan\nCapital?,Paris\n");
        let bank = load_bank(&path, "Question", "Answer").unwrap();

        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get(1).unwrap().question_text, "Capital?");
    }

    #[test]
    fn test_duplicate_questions_keep_row_order() {
        let (_dir, path) = write_csv("Question,Answer\nSame question,first\nSame question,second\n");
        let bank = load_bank(&path, "Question", "Answer").unwrap();

        // 重复题目全部保留，行序不变；匹配时第一行胜出
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get(0).unwrap().answer_text, "first");
    }

    #[test]
    fn test_empty_bank_is_error() {
        let (_dir, path) = write_csv("Question,Answer\n");
        let err = load_bank(&path, "Question", "Answer").unwrap_err();
        assert!(matches!(err, AppError::Bank(BankError::EmptyBank { .. })));
    }

    #[test]
    fn test_missing_file() {
        let err = load_bank("no_such/bank.csv", "Question", "Answer").unwrap_err();
        assert!(matches!(err, AppError::Bank(BankError::NotFound { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.toml");
        std::fs::File::create(&path).unwrap();
        let err = load_bank(&path.to_string_lossy(), "Question", "Answer").unwrap_err();
        assert!(matches!(
            err,
            AppError::Bank(BankError::UnsupportedFormat { .. })
        ));
    }
}
