use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

/// Declares [`Messages`] together with [`MessageOverrides`], its
/// all-optional mirror used for partial tables in a config file.
macro_rules! messages {
    ($($field:ident),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct Messages {
            $(pub $field: String,)*
        }

        #[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
        #[serde(deny_unknown_fields)]
        pub struct MessageOverrides {
            $(
                #[serde(default)]
                pub $field: Option<String>,
            )*
        }

        impl MessageOverrides {
            pub fn apply(&self, mut base: Messages) -> Messages {
                $(
                    if let Some(text) = &self.$field {
                        base.$field = text.clone();
                    }
                )*
                base
            }
        }
    };
}

messages!(
    title,
    heading,
    add,
    subtract,
    multiply,
    divide,
    exit,
    select_prompt,
    first_operand_prompt,
    second_operand_prompt,
    invalid_selection,
    invalid_number,
    result_label,
    division_by_zero,
    goodbye,
);

impl Messages {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self::english(),
            Locale::Ja => Self::japanese(),
        }
    }

    pub fn english() -> Self {
        Self {
            title: "=== Simple Calculator ===".into(),
            heading: "Operations:".into(),
            add: "Add".into(),
            subtract: "Subtract".into(),
            multiply: "Multiply".into(),
            divide: "Divide".into(),
            exit: "Exit".into(),
            select_prompt: "Select operation (1/2/3/4/5): ".into(),
            first_operand_prompt: "Enter first number: ".into(),
            second_operand_prompt: "Enter second number: ".into(),
            invalid_selection: "Invalid selection. Please try again.".into(),
            invalid_number: "Invalid input. Please enter a number.".into(),
            result_label: "Result".into(),
            division_by_zero: "Error: cannot divide by zero".into(),
            goodbye: "Exiting calculator.".into(),
        }
    }

    pub fn japanese() -> Self {
        Self {
            title: "=== 簡単な計算ツール ===".into(),
            heading: "操作:".into(),
            add: "足算".into(),
            subtract: "引算".into(),
            multiply: "掛算".into(),
            divide: "割算".into(),
            exit: "終了".into(),
            select_prompt: "操作を選んでください (1/2/3/4/5): ".into(),
            first_operand_prompt: "最初の数字を入力してください: ".into(),
            second_operand_prompt: "次の数字を入力してください: ".into(),
            invalid_selection: "無効な選択です。もう一度試してください。".into(),
            invalid_number: "無効な入力です。数字を入力してください。".into(),
            result_label: "結果".into(),
            division_by_zero: "エラー: 0で割ることはできません".into(),
            goodbye: "計算ツールを終了します。".into(),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::english()
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub messages: MessageOverrides,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let txt = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&txt).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `locale` takes precedence over the locale named in the file.
    pub fn messages(&self, locale: Option<Locale>) -> Messages {
        let base = Messages::for_locale(locale.unwrap_or(self.locale));
        self.messages.apply(base)
    }
}
