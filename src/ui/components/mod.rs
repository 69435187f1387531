//! UI components

mod answer_view;
mod input_bar;
mod question_list;
mod upload_panel;

pub use answer_view::AnswerView;
pub use input_bar::InputBar;
pub use question_list::QuestionList;
pub use upload_panel::UploadPanel;
