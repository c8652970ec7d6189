//! Rule-based saving advice.

use maud::{Markup, html};

use crate::{
    alert::Alert, dashboard::aggregation::by_category, html::format_currency,
    transaction::Transaction,
};

/// How much of their income a user is spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    /// There is no income to compare spending against.
    NoAdvice,
    /// Expenses are more than income.
    Overspending,
    /// Expenses are more than 80% of income.
    HighSpend,
    /// Expenses are more than half of income.
    Moderate,
    /// Expenses are half of income or less.
    Healthy,
}

impl Advice {
    /// The advice as a sentence for the user.
    pub fn message(self) -> &'static str {
        match self {
            Advice::NoAdvice => "Add income to get savings advice.",
            Advice::Overspending => "You're spending more than you earn! Consider reducing bills.",
            Advice::HighSpend => {
                "You're spending over 80% of your income. Try cutting down non-essentials."
            }
            Advice::Moderate => "You're saving some money, but review your biggest expenses.",
            Advice::Healthy => "Excellent! You're saving a healthy portion of your income.",
        }
    }

    fn into_alert(self) -> Alert {
        let message = self.message().to_owned();

        match self {
            Advice::NoAdvice | Advice::Moderate => Alert::Info { message },
            Advice::Overspending => Alert::Error {
                message,
                details: String::new(),
            },
            Advice::HighSpend => Alert::Warning { message },
            Advice::Healthy => Alert::SuccessSimple { message },
        }
    }
}

/// The expense category with the most spending and how much cutting it back would save.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCut {
    /// The expense category, e.g. "Rent".
    pub category: String,
    /// The total spent in the category.
    pub total: f64,
    /// 15% of `total`.
    pub suggested_cut: f64,
}

impl CategoryCut {
    /// The share of the top category's spending that a user is advised to cut.
    pub const CUT_RATIO: f64 = 0.15;

    /// The suggestion as a sentence for the user.
    pub fn message(&self) -> String {
        format!(
            "You're spending the most on {} ({}). Try reducing it by 15% to save {} this month.",
            self.category,
            format_currency(self.total),
            format_currency(self.suggested_cut)
        )
    }
}

/// Saving advice for a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// How much of their income the user is spending.
    pub advice: Advice,
    /// The category to cut back on, `None` when there are no expenses.
    pub top_category: Option<CategoryCut>,
}

/// Advise a user based on the ratio of their spending to their income.
///
/// The thresholds are exclusive, e.g. spending exactly all of your income is
/// [Advice::HighSpend] and not [Advice::Overspending]. Ties for the top
/// category go to the category that sorts first by name.
pub fn suggest(total_income: f64, total_expense: f64, expense: &[Transaction]) -> Suggestion {
    let advice = if total_income <= 0.0 {
        Advice::NoAdvice
    } else {
        let ratio = total_expense / total_income;

        if ratio > 1.0 {
            Advice::Overspending
        } else if ratio > 0.8 {
            Advice::HighSpend
        } else if ratio > 0.5 {
            Advice::Moderate
        } else {
            Advice::Healthy
        }
    };

    let top_category = by_category(expense)
        .into_iter()
        .next()
        .map(|category| CategoryCut {
            suggested_cut: category.total * CategoryCut::CUT_RATIO,
            category: category.label,
            total: category.total,
        });

    Suggestion {
        advice,
        top_category,
    }
}

/// Renders the advice as an alert, followed by the category to cut back on.
///
/// The category is only shown alongside a spending ratio, i.e., when there is income.
pub(super) fn suggestion_view(suggestion: Suggestion) -> Markup {
    let top_category = match suggestion.advice {
        Advice::NoAdvice => None,
        _ => suggestion.top_category,
    };

    html! {
        section id="suggestion" class="w-full mb-4"
        {
            h2 class="text-xl font-bold mb-2" { "Smart Saving Suggestions" }

            (suggestion.advice.into_alert().into_html())

            @if let Some(top_category) = top_category {
                p id="top-category" class="text-gray-700 dark:text-gray-300"
                {
                    (top_category.message())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::transaction::Transaction;

    use super::{Advice, CategoryCut, Suggestion, suggest, suggestion_view};

    fn expense(id: i64, label: &str, amount: f64) -> Transaction {
        Transaction {
            id,
            date: date!(2024 - 01 - 20),
            label: label.to_owned(),
            amount,
        }
    }

    #[test]
    fn no_income_gives_no_advice() {
        let suggestion = suggest(0.0, 100.0, &[expense(1, "Food", 100.0)]);

        assert_eq!(suggestion.advice, Advice::NoAdvice);
    }

    #[test]
    fn advice_ladder() {
        let cases = [
            (1000.0, 1000.01, Advice::Overspending),
            (1000.0, 1000.0, Advice::HighSpend),
            (1000.0, 801.0, Advice::HighSpend),
            (1000.0, 800.0, Advice::Moderate),
            (1000.0, 501.0, Advice::Moderate),
            (1000.0, 500.0, Advice::Healthy),
            (1000.0, 400.0, Advice::Healthy),
            (1000.0, 0.0, Advice::Healthy),
        ];

        for (income, expenses, want) in cases {
            assert_eq!(
                suggest(income, expenses, &[]).advice,
                want,
                "income {income}, expenses {expenses}"
            );
        }
    }

    #[test]
    fn suggests_cutting_the_biggest_category() {
        let expenses = [
            expense(1, "Food", 100.0),
            expense(2, "Rent", 1200.0),
            expense(3, "Food", 50.0),
        ];

        let suggestion = suggest(3000.0, 1350.0, &expenses);

        assert_eq!(
            suggestion,
            Suggestion {
                advice: Advice::Healthy,
                top_category: Some(CategoryCut {
                    category: "Rent".to_owned(),
                    total: 1200.0,
                    suggested_cut: 180.0,
                }),
            }
        );
    }

    #[test]
    fn top_category_tie_goes_to_first_name() {
        let expenses = [expense(1, "Transport", 60.0), expense(2, "Food", 60.0)];

        let suggestion = suggest(1000.0, 120.0, &expenses);

        assert_eq!(
            suggestion.top_category.map(|category| category.category),
            Some("Food".to_owned())
        );
    }

    #[test]
    fn no_expenses_means_no_top_category() {
        assert_eq!(suggest(1000.0, 0.0, &[]).top_category, None);
    }

    #[test]
    fn category_cut_message() {
        let cut = CategoryCut {
            category: "Food".to_owned(),
            total: 120.0,
            suggested_cut: 18.0,
        };

        assert_eq!(
            cut.message(),
            "You're spending the most on Food ($120.00). Try reducing it by 15% to save $18.00 this month."
        );
    }

    #[test]
    fn view_hides_top_category_without_income() {
        let suggestion = suggest(0.0, 100.0, &[expense(1, "Food", 100.0)]);

        let html = Html::parse_fragment(&suggestion_view(suggestion).into_string());

        let alert = html
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("No alert found");
        assert_eq!(
            alert.text().collect::<String>().trim(),
            Advice::NoAdvice.message()
        );
        assert!(
            html.select(&Selector::parse("#top-category").unwrap())
                .next()
                .is_none()
        );
    }

    #[test]
    fn view_shows_top_category_with_income() {
        let suggestion = suggest(3000.0, 1200.0, &[expense(1, "Rent", 1200.0)]);

        let html = Html::parse_fragment(&suggestion_view(suggestion).into_string());

        let top_category = html
            .select(&Selector::parse("#top-category").unwrap())
            .next()
            .expect("No top category found");
        assert!(
            top_category
                .text()
                .collect::<String>()
                .contains("You're spending the most on Rent")
        );
    }
}
