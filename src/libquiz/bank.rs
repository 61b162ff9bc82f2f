use log::debug;
use std::path::PathBuf;

use crate::libquiz::error::Error;

/// How a question is answered. A closed set: the game only ever presents
/// up to four answer slots, and true/false questions pin slot 0 to "True"
/// and slot 1 to "False".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice { options: Vec<String>, correct: usize },
    TrueFalse { answer: bool },
}

impl QuestionKind {
    /// Number of answer slots this question presents.
    pub fn option_count(&self) -> usize {
        match self {
            QuestionKind::MultipleChoice { options, .. } => options.len(),
            QuestionKind::TrueFalse { .. } => 2,
        }
    }

    /// Whether the given answer slot is the right one.
    pub fn is_correct(&self, slot: usize) -> bool {
        match self {
            QuestionKind::MultipleChoice { correct, .. } => slot == *correct,
            QuestionKind::TrueFalse { answer } => (slot == 0) == *answer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    image: Option<PathBuf>,
    kind: QuestionKind,
}

impl Question {
    pub fn multiple_choice(
        text: impl Into<String>,
        options: Vec<String>,
        correct: usize,
        image: Option<PathBuf>,
    ) -> Result<Question, Error> {
        let text = text.into();
        if text.is_empty() {
            return Err(Error::InvalidQuestion("question text is empty".into()));
        }
        if options.len() < 2 || options.len() > 4 {
            return Err(Error::InvalidQuestion(format!(
                "{} options; a question must present between 2 and 4",
                options.len()
            )));
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].contains(option) {
                return Err(Error::InvalidQuestion(format!(
                    "duplicate option '{option}'"
                )));
            }
        }
        if correct >= options.len() {
            return Err(Error::InvalidQuestion(format!(
                "correct index {correct} out of range for {} options",
                options.len()
            )));
        }
        Ok(Question {
            text,
            image,
            kind: QuestionKind::MultipleChoice { options, correct },
        })
    }

    pub fn true_false(
        text: impl Into<String>,
        answer: bool,
        image: Option<PathBuf>,
    ) -> Result<Question, Error> {
        let text = text.into();
        if text.is_empty() {
            return Err(Error::InvalidQuestion("question text is empty".into()));
        }
        Ok(Question {
            text,
            image,
            kind: QuestionKind::TrueFalse { answer },
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Opaque asset reference for the view to resolve. The core never reads
    /// image bytes.
    pub fn image(&self) -> Option<&PathBuf> {
        self.image.as_ref()
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// The answer labels in slot order, as the view should show them.
    pub fn presented_options(&self) -> Vec<&str> {
        match &self.kind {
            QuestionKind::MultipleChoice { options, .. } => {
                options.iter().map(String::as_str).collect()
            }
            QuestionKind::TrueFalse { .. } => vec!["True", "False"],
        }
    }
}

/// A named, ordered run of questions. Order is significant: the game walks
/// the list front to back, no shuffling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub questions: Vec<Question>,
}

impl Category {
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Result<Category, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidQuestion("category name is empty".into()));
        }
        if questions.is_empty() {
            return Err(Error::InvalidQuestion(format!(
                "category '{name}' has no questions"
            )));
        }
        Ok(Category { name, questions })
    }
}

/// Read-only question storage. Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    categories: Vec<Category>,
}

macro_rules! mc {
    ($text:expr, [$($option:expr),+ $(,)?], $correct:expr) => {
        Question::multiple_choice($text, vec![$($option.to_string()),+], $correct, None)
            .expect("built-in question data is valid")
    };
    ($text:expr, [$($option:expr),+ $(,)?], $correct:expr, $image:expr) => {
        Question::multiple_choice(
            $text,
            vec![$($option.to_string()),+],
            $correct,
            Some(PathBuf::from($image)),
        )
        .expect("built-in question data is valid")
    };
}

impl QuestionBank {
    pub fn new(categories: Vec<Category>) -> QuestionBank {
        debug!("[Bank] Loaded {} categories", categories.len());
        QuestionBank { categories }
    }

    /// The compiled-in question set: Math, Science, History and
    /// Programming, ten questions each, in presentation order.
    pub fn builtin() -> QuestionBank {
        let math = Category::new(
            "Math",
            vec![
                mc!("What is 7 x 8?", ["54", "56", "62", "64"], 1),
                mc!("What is the square root of 144?", ["10", "12", "14", "16"], 1),
                mc!("What is 15% of 80?", ["10", "12", "15", "18"], 1),
                mc!(
                    "What is the value of π (pi) to two decimal places?",
                    ["3.14", "3.16", "3.18", "3.20"],
                    0
                ),
                mc!(
                    "What is the next number in the sequence: 2, 4, 8, 16, ...?",
                    ["24", "28", "32", "36"],
                    2
                ),
                mc!(
                    "What is the area of a rectangle with length 8 cm and width 5 cm?",
                    ["35 cm²", "38 cm²", "40 cm²", "42 cm²"],
                    2
                ),
                mc!("What is the result of 5² + 3³?", ["34", "36", "38", "40"], 2),
                mc!("If x + 5 = 12, what is the value of x?", ["5", "6", "7", "8"], 2),
                mc!(
                    "What is the sum of the angles in a triangle?",
                    ["90°", "120°", "180°", "360°"],
                    2
                ),
                mc!("What is 3/4 expressed as a decimal?", ["0.65", "0.70", "0.75", "0.80"], 2),
            ],
        );
        let science = Category::new(
            "Science",
            vec![
                mc!(
                    "Which planet is known as the Red Planet?",
                    ["Venus", "Mars", "Jupiter", "Saturn"],
                    1,
                    "/images/mars.jpg"
                ),
                mc!(
                    "What is the chemical symbol for water?",
                    ["H2O", "CO2", "NaCl", "O2"],
                    0,
                    "/images/science.jpg"
                ),
                mc!(
                    "What is the largest organ in the human body?",
                    ["Heart", "Brain", "Liver", "Skin"],
                    3,
                    "/images/human_body.jpg"
                ),
                mc!(
                    "Which of these is not a state of matter?",
                    ["Solid", "Liquid", "Gas", "Energy"],
                    3,
                    "/images/matter_states.jpg"
                ),
                mc!(
                    "What is the closest star to Earth?",
                    ["Proxima Centauri", "Alpha Centauri", "Sirius", "The Sun"],
                    3,
                    "/images/stars.png"
                ),
                mc!(
                    "Which of these is not a type of rock?",
                    ["Igneous", "Sedimentary", "Metamorphic", "Volcanic"],
                    3,
                    "/images/rocks.jpg"
                ),
                mc!(
                    "What is the speed of light in vacuum?",
                    ["299,792 km/s", "300,000 km/s", "310,000 km/s", "320,000 km/s"],
                    1,
                    "/images/light_speed.jpg"
                ),
                mc!(
                    "Which element has the chemical symbol 'Fe'?",
                    ["Fluorine", "Ferrum (Iron)", "Francium", "Fermium"],
                    1,
                    "/images/periodic_table.png"
                ),
                mc!(
                    "What is the process by which plants make their own food?",
                    ["Photosynthesis", "Respiration", "Transpiration", "Germination"],
                    0,
                    "/images/photosynthesis.jpg"
                ),
                mc!(
                    "Which of these is not a greenhouse gas?",
                    ["Carbon dioxide", "Methane", "Water vapor", "Nitrogen"],
                    3,
                    "/images/greenhouse_gases.jpg"
                ),
            ],
        );
        let history = Category::new(
            "History",
            vec![
                mc!(
                    "In which year did World War II end?",
                    ["1943", "1945", "1947", "1950"],
                    1,
                    "/images/history.jpg"
                ),
                mc!(
                    "Who was the first President of the United States?",
                    ["Thomas Jefferson", "John Adams", "George Washington", "Benjamin Franklin"],
                    2,
                    "/images/history2.jpg"
                ),
                mc!(
                    "In which year did Christopher Columbus first reach the Americas?",
                    ["1492", "1500", "1510", "1520"],
                    0,
                    "/images/columbus.jpg"
                ),
                mc!(
                    "Who was the first woman to fly solo across the Atlantic Ocean?",
                    ["Amelia Earhart", "Bessie Coleman", "Harriet Quimby", "Jacqueline Cochran"],
                    0,
                    "/images/aviation.jpg"
                ),
                mc!(
                    "Which ancient wonder was located in Alexandria, Egypt?",
                    ["Hanging Gardens", "Colossus of Rhodes", "Lighthouse", "Temple of Artemis"],
                    2,
                    "/images/ancient_wonders.jpg"
                ),
                mc!(
                    "Who wrote the Declaration of Independence?",
                    ["George Washington", "Benjamin Franklin", "John Adams", "Thomas Jefferson"],
                    3,
                    "/images/declaration.jpg"
                ),
                mc!(
                    "In which year did the Berlin Wall fall?",
                    ["1987", "1989", "1991", "1993"],
                    1,
                    "/images/berlin_wall.jpg"
                ),
                mc!(
                    "Who was the first Emperor of Rome?",
                    ["Julius Caesar", "Augustus", "Nero", "Caligula"],
                    1,
                    "/images/roman_empire.jpg"
                ),
                mc!(
                    "Which country was NOT part of the Allied Powers during World War II?",
                    ["United States", "Soviet Union", "United Kingdom", "Italy"],
                    3,
                    "/images/allied_powers.png"
                ),
                mc!(
                    "In which year did the Titanic sink?",
                    ["1910", "1912", "1914", "1916"],
                    1,
                    "/images/titanic.jpg"
                ),
            ],
        );
        let programming = Category::new(
            "Programming",
            vec![
                mc!(
                    "Which of the following is not a programming language?",
                    ["Java", "Python", "HTML", "C++"],
                    2,
                    "/images/programming.jpg"
                ),
                mc!(
                    "What does CPU stand for?",
                    [
                        "Central Processing Unit",
                        "Computer Personal Unit",
                        "Central Processor Unifier",
                        "Central Program Utility"
                    ],
                    0,
                    "/images/programming2.jpg"
                ),
                mc!(
                    "Which data structure uses LIFO (Last In, First Out)?",
                    ["Queue", "Stack", "Linked List", "Array"],
                    1,
                    "/images/programming3.png"
                ),
                mc!(
                    "What does SQL stand for?",
                    [
                        "Structured Query Language",
                        "Simple Question Language",
                        "Structured Question Logic",
                        "System Query Language"
                    ],
                    0,
                    "/images/programming4.png"
                ),
                mc!(
                    "Which of these is not an object-oriented programming language?",
                    ["Java", "C++", "Python", "C"],
                    3,
                    "/images/programming.jpg"
                ),
                mc!(
                    "What is the correct file extension for Python files?",
                    [".py", ".pt", ".pyt", ".pth"],
                    0,
                    "/images/programming5.png"
                ),
                mc!(
                    "Which of these is not a type of loop in programming?",
                    ["For", "While", "Do-While", "Repeat-Until"],
                    3,
                    "/images/programming6.png"
                ),
                mc!(
                    "What does IDE stand for in programming?",
                    [
                        "Integrated Development Environment",
                        "Interface Design Engine",
                        "Integrated Debugging Environment",
                        "Interactive Development Engine"
                    ],
                    0,
                    "/images/programming7.jpg"
                ),
                mc!(
                    "Which of these is not a common sorting algorithm?",
                    ["Bubble Sort", "Quick Sort", "Merge Sort", "Linear Sort"],
                    3,
                    "/images/programming8.png"
                ),
                mc!(
                    "What is the purpose of the 'git' version control system?",
                    [
                        "To compile code",
                        "To debug programs",
                        "To track changes in source code",
                        "To design user interfaces"
                    ],
                    2,
                    "/images/programming9.jpg"
                ),
            ],
        );

        QuestionBank::new(vec![
            math.expect("built-in category data is valid"),
            science.expect("built-in category data is valid"),
            history.expect("built-in category data is valid"),
            programming.expect("built-in category data is valid"),
        ])
    }

    /// All categories, in stable presentation order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Index of the named category. Lookup ignores ASCII case so typed
    /// input like "math" matches.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.categories
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn questions_for(&self, name: &str) -> Result<&Category, Error> {
        self.find(name)
            .map(|idx| &self.categories[idx])
            .ok_or_else(|| Error::UnknownCategory(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_four_categories_of_ten() {
        let bank = QuestionBank::builtin();
        let names: Vec<&str> = bank.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Math", "Science", "History", "Programming"]);
        for category in bank.categories() {
            assert_eq!(category.questions.len(), 10, "{}", category.name);
        }
    }

    #[test]
    fn builtin_questions_satisfy_presentation_contract() {
        let bank = QuestionBank::builtin();
        for category in bank.categories() {
            for question in &category.questions {
                let count = question.kind().option_count();
                assert!((2..=4).contains(&count));
                assert_eq!(question.presented_options().len(), count);
                assert!(!question.text().is_empty());
            }
        }
    }

    #[test]
    fn lookup_ignores_case_and_rejects_unknown_names() {
        let bank = QuestionBank::builtin();
        assert_eq!(bank.questions_for("math").unwrap().name, "Math");
        assert_eq!(bank.find("PROGRAMMING"), Some(3));
        assert_eq!(
            bank.questions_for("Geography"),
            Err(Error::UnknownCategory("Geography".to_string()))
        );
    }

    #[test]
    fn math_questions_carry_no_images_but_science_does() {
        let bank = QuestionBank::builtin();
        assert!(bank.categories()[0].questions.iter().all(|q| q.image().is_none()));
        assert_eq!(
            bank.categories()[1].questions[0].image(),
            Some(&PathBuf::from("/images/mars.jpg"))
        );
    }

    #[test]
    fn multiple_choice_rejects_bad_shapes() {
        let one = Question::multiple_choice("q", vec!["a".into()], 0, None);
        assert!(matches!(one, Err(Error::InvalidQuestion(_))));

        let five = Question::multiple_choice(
            "q",
            vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
            0,
            None,
        );
        assert!(matches!(five, Err(Error::InvalidQuestion(_))));

        let dup = Question::multiple_choice("q", vec!["a".into(), "a".into()], 0, None);
        assert!(matches!(dup, Err(Error::InvalidQuestion(_))));

        let out_of_range = Question::multiple_choice("q", vec!["a".into(), "b".into()], 2, None);
        assert!(matches!(out_of_range, Err(Error::InvalidQuestion(_))));

        let empty_text = Question::multiple_choice("", vec!["a".into(), "b".into()], 0, None);
        assert!(matches!(empty_text, Err(Error::InvalidQuestion(_))));
    }

    #[test]
    fn true_false_presents_fixed_slots() {
        let question = Question::true_false("The sky is blue.", true, None).unwrap();
        assert_eq!(question.presented_options(), ["True", "False"]);
        assert_eq!(question.kind().option_count(), 2);
    }

    #[test]
    fn category_rejects_empty_inputs() {
        assert!(matches!(Category::new("", vec![]), Err(Error::InvalidQuestion(_))));
        assert!(matches!(
            Category::new("Empty", vec![]),
            Err(Error::InvalidQuestion(_))
        ));
    }

    #[test]
    fn correctness_matches_the_recorded_answer_for_every_builtin_question() {
        let bank = QuestionBank::builtin();
        for category in bank.categories() {
            for question in &category.questions {
                let QuestionKind::MultipleChoice { correct, .. } = question.kind() else {
                    panic!("built-in bank is multiple choice only");
                };
                for slot in 0..question.kind().option_count() {
                    assert_eq!(question.kind().is_correct(slot), slot == *correct);
                }
            }
        }
    }

    #[test]
    fn true_false_correctness_is_symmetric() {
        let yes = Question::true_false("q", true, None).unwrap();
        assert!(yes.kind().is_correct(0));
        assert!(!yes.kind().is_correct(1));

        let no = Question::true_false("q", false, None).unwrap();
        assert!(!no.kind().is_correct(0));
        assert!(no.kind().is_correct(1));
    }
}
