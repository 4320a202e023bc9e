use crate::domain::{
    owner::OwnerId,
    record::{Collection, PendingWrite, Record},
    task::{Task, TaskId},
};
use crate::error::{MonolithError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

record_id!(
    /// Unique identifier for a board column
    ColumnId,
    "column"
);

/// A kanban lane. `order` is its left-to-right position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub order: u32,
    pub owner_id: OwnerId,
}

impl Column {
    pub fn new(id: ColumnId, title: String, order: u32, owner_id: OwnerId) -> Self {
        Self {
            id,
            title,
            order,
            owner_id,
        }
    }
}

/// Moves the element at `from` so that it ends up at index `to`.
///
/// The element is removed first and `to` is interpreted against the shortened
/// sequence, so moving index 0 to index 2 of `[A, B, C]` yields `[B, C, A]`.
/// Out of range source indices leave the sequence untouched; a target past the
/// end appends.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

/// Board state: ordered columns plus the overall task sequence.
///
/// A column displays the tasks whose status is its id, in overall sequence
/// order. All mutations update the in-memory state immediately and return the
/// writes that must be sent to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    columns: Vec<Column>,
    tasks: Vec<Task>,
}

impl Board {
    /// Builds a board from store snapshots; columns are sorted by `order`
    pub fn new(mut columns: Vec<Column>, tasks: Vec<Task>) -> Self {
        columns.sort_by_key(|column| column.order);
        Self { columns, tasks }
    }

    /// Board with the stock Backlog / To Do / In Progress / Done lanes
    pub fn with_default_columns(owner_id: &OwnerId) -> Self {
        let lanes = [
            ("backlog", "Backlog"),
            ("todo", "To Do"),
            ("inprogress", "In Progress"),
            ("done", "Done"),
        ];
        let columns = lanes
            .iter()
            .zip(0u32..)
            .map(|((id, title), order)| {
                Column::new(
                    ColumnId(id.to_string()),
                    title.to_string(),
                    order,
                    owner_id.clone(),
                )
            })
            .collect();
        Self::new(columns, Vec::new())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| &column.id == id)
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Tasks shown in a column, in display order
    pub fn tasks_in_column<'a>(&'a self, column: &ColumnId) -> impl Iterator<Item = &'a Task> + 'a {
        let column = column.clone();
        self.tasks.iter().filter(move |task| task.is_in(&column))
    }

    fn task_index(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    fn column_index(&self, id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|column| &column.id == id)
    }

    /// Drag of task `active` over task `over`.
    ///
    /// Within one column this is a plain array move to the target's index.
    /// Across columns the task takes the target's column and lands immediately
    /// before the target. Unknown ids and `active == over` are no-ops.
    pub fn move_task_over_task(&mut self, active: &TaskId, over: &TaskId) -> Vec<PendingWrite> {
        if active == over {
            return Vec::new();
        }
        let (Some(from), Some(to)) = (self.task_index(active), self.task_index(over)) else {
            debug!(%active, %over, "Ignoring task move with unknown id");
            return Vec::new();
        };

        let target_column = self.tasks[to].status.clone();
        if self.tasks[from].status == target_column {
            array_move(&mut self.tasks, from, to);
            debug!(%active, %over, from, to, "Reordered task within column");
            return Vec::new();
        }

        // After removing `from`, everything behind it shifts left by one.
        let before_target = if from < to { to - 1 } else { to };
        self.tasks[from].status = target_column;
        array_move(&mut self.tasks, from, before_target);
        debug!(%active, %over, "Moved task across columns");

        vec![PendingWrite::Upsert(Record::Task(
            self.tasks[before_target].clone(),
        ))]
    }

    /// Drag of task `active` over column `column`.
    ///
    /// A task changing column is appended after the last task of that column.
    /// Dropping onto its own column or an unknown id is a no-op.
    pub fn move_task_over_column(
        &mut self,
        active: &TaskId,
        column: &ColumnId,
    ) -> Vec<PendingWrite> {
        let Some(from) = self.task_index(active) else {
            debug!(%active, %column, "Ignoring column drop of unknown task");
            return Vec::new();
        };
        if self.column(column).is_none() {
            debug!(%active, %column, "Ignoring drop on unknown column");
            return Vec::new();
        }
        if self.tasks[from].is_in(column) {
            return Vec::new();
        }

        let mut task = self.tasks.remove(from);
        task.status = column.clone();
        let insert_at = self
            .tasks
            .iter()
            .rposition(|t| t.is_in(column))
            .map_or(self.tasks.len(), |last| last + 1);
        self.tasks.insert(insert_at, task.clone());
        debug!(%active, %column, insert_at, "Appended task to column");

        vec![PendingWrite::Upsert(Record::Task(task))]
    }

    /// Drag of column `active` onto column `over`.
    ///
    /// Columns are array-moved, then every `order` is rewritten to the column's
    /// new index. Only columns whose order changed are returned for
    /// persisting.
    pub fn move_column(&mut self, active: &ColumnId, over: &ColumnId) -> Vec<PendingWrite> {
        if active == over {
            return Vec::new();
        }
        let (Some(from), Some(to)) = (self.column_index(active), self.column_index(over)) else {
            debug!(%active, %over, "Ignoring column move with unknown id");
            return Vec::new();
        };

        array_move(&mut self.columns, from, to);
        self.renumber_columns()
    }

    fn renumber_columns(&mut self) -> Vec<PendingWrite> {
        let mut writes = Vec::new();
        for (index, column) in self.columns.iter_mut().enumerate() {
            let order = index as u32;
            if column.order != order {
                column.order = order;
                writes.push(PendingWrite::Upsert(Record::Column(column.clone())));
            }
        }
        writes
    }

    /// Appends a new column titled `Column N`
    pub fn add_column(&mut self, owner_id: OwnerId) -> PendingWrite {
        let order = self.columns.len() as u32;
        let column = Column::new(
            ColumnId::generate(),
            format!("Column {}", order + 1),
            order,
            owner_id,
        );
        self.columns.push(column.clone());
        PendingWrite::Upsert(Record::Column(column))
    }

    /// Replaces a column's fields; the column keeps its position
    pub fn update_column(&mut self, column: Column) -> Result<PendingWrite> {
        let index = self
            .column_index(&column.id)
            .ok_or_else(|| not_found(Collection::Columns, column.id.as_str()))?;
        let order = self.columns[index].order;
        self.columns[index] = Column { order, ..column };
        Ok(PendingWrite::Upsert(Record::Column(
            self.columns[index].clone(),
        )))
    }

    /// Adds a task at the end of the overall sequence
    pub fn add_task(&mut self, task: Task) -> Result<PendingWrite> {
        self.ensure_column(&task.status)?;
        self.tasks.push(task.clone());
        Ok(PendingWrite::Upsert(Record::Task(task)))
    }

    /// Replaces a task's fields in place
    pub fn update_task(&mut self, task: Task) -> Result<PendingWrite> {
        self.ensure_column(&task.status)?;
        let index = self
            .task_index(&task.id)
            .ok_or_else(|| not_found(Collection::Tasks, task.id.as_str()))?;
        self.tasks[index] = task.clone();
        Ok(PendingWrite::Upsert(Record::Task(task)))
    }

    /// Removes a task, `None` when it is already gone
    pub fn remove_task(&mut self, id: &TaskId) -> Option<PendingWrite> {
        let index = self.task_index(id)?;
        self.tasks.remove(index);
        Some(PendingWrite::Delete {
            collection: Collection::Tasks,
            id: id.to_string(),
        })
    }

    fn ensure_column(&self, id: &ColumnId) -> Result<()> {
        self.column(id)
            .map(|_| ())
            .ok_or_else(|| not_found(Collection::Columns, id.as_str()))
    }
}

fn not_found(collection: Collection, id: &str) -> MonolithError {
    MonolithError::RecordNotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}

/// Item being dragged or hovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragItem {
    Task(TaskId),
    Column(ColumnId),
}

/// One drag gesture, from pick-up to drop.
///
/// The drag layer reports hover events continuously; the session only acts
/// when the hovered item changes, so repeating an event is a no-op.
#[derive(Debug, Clone)]
pub struct DragSession {
    active: DragItem,
    last_over: Option<DragItem>,
}

impl DragSession {
    pub fn start(active: DragItem) -> Self {
        Self {
            active,
            last_over: None,
        }
    }

    pub fn active(&self) -> &DragItem {
        &self.active
    }

    /// Handles the pointer moving over `over`. Only task drags reorder live.
    pub fn hover(&mut self, board: &mut Board, over: &DragItem) -> Vec<PendingWrite> {
        if self.last_over.as_ref() == Some(over) {
            return Vec::new();
        }
        self.last_over = Some(over.clone());

        match (&self.active, over) {
            (DragItem::Task(active), DragItem::Task(target)) => {
                board.move_task_over_task(active, target)
            }
            (DragItem::Task(active), DragItem::Column(column)) => {
                board.move_task_over_column(active, column)
            }
            (DragItem::Column(_), _) => Vec::new(),
        }
    }

    /// Ends the gesture over `over`. Column drags are applied here.
    pub fn finish(self, board: &mut Board, over: Option<&DragItem>) -> Vec<PendingWrite> {
        match (&self.active, over) {
            (DragItem::Column(active), Some(DragItem::Column(target))) => {
                board.move_column(active, target)
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        "u1".parse().unwrap()
    }

    fn col(id: &str, order: u32) -> Column {
        Column::new(id.parse().unwrap(), id.to_uppercase(), order, owner())
    }

    fn task(id: &str, column: &str) -> Task {
        let mut task = Task::new(
            id.to_string(),
            column.parse().unwrap(),
            "proj-1".parse().unwrap(),
            owner(),
        );
        task.id = id.parse().unwrap();
        task
    }

    fn tid(id: &str) -> TaskId {
        id.parse().unwrap()
    }

    fn cid(id: &str) -> ColumnId {
        id.parse().unwrap()
    }

    fn order(board: &Board) -> Vec<&str> {
        board.tasks().iter().map(|t| t.id.as_str()).collect()
    }

    fn column_ids(board: &Board) -> Vec<&str> {
        board.columns().iter().map(|c| c.id.as_str()).collect()
    }

    fn sample_board() -> Board {
        Board::new(
            vec![col("x", 0), col("y", 1)],
            vec![
                task("a", "x"),
                task("b", "x"),
                task("c", "x"),
                task("d", "y"),
                task("e", "y"),
            ],
        )
    }

    #[test]
    fn test_array_move() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        array_move(&mut items, 0, 2);
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);

        let mut items = vec!['a', 'b', 'c', 'd'];
        array_move(&mut items, 3, 1);
        assert_eq!(items, vec!['a', 'd', 'b', 'c']);

        let mut items = vec!['a', 'b', 'c'];
        array_move(&mut items, 1, 2);
        assert_eq!(items, vec!['a', 'c', 'b']);

        let mut items = vec!['a', 'b', 'c'];
        array_move(&mut items, 2, 1);
        assert_eq!(items, vec!['a', 'c', 'b']);
    }

    #[test]
    fn test_array_move_edge_cases() {
        let mut items = vec![1, 2, 3];
        array_move(&mut items, 5, 0);
        assert_eq!(items, vec![1, 2, 3]);

        array_move(&mut items, 0, 10);
        assert_eq!(items, vec![2, 3, 1]);

        array_move(&mut items, 1, 1);
        assert_eq!(items, vec![2, 3, 1]);
    }

    #[test]
    fn test_board_sorts_columns_by_order() {
        let board = Board::new(vec![col("c", 2), col("a", 0), col("b", 1)], Vec::new());
        assert_eq!(column_ids(&board), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_default_columns() {
        let owner: OwnerId = "u1".parse().unwrap();
        let board = Board::with_default_columns(&owner);

        assert_eq!(column_ids(&board), vec!["backlog", "todo", "inprogress", "done"]);
        let orders: Vec<u32> = board.columns().iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
        assert!(board.columns().iter().all(|c| c.owner_id == owner));
        assert!(board.tasks().is_empty());
    }

    #[test]
    fn test_tasks_in_column_outlive_the_column_id() {
        let board = sample_board();

        let in_x: Vec<&Task> = {
            let column = cid("x");
            board.tasks_in_column(&column).collect()
        };

        let ids: Vec<_> = in_x.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_same_column_move_is_array_move() {
        let mut board = Board::new(
            vec![col("x", 0)],
            vec![task("a", "x"), task("b", "x"), task("c", "x")],
        );

        let writes = board.move_task_over_task(&tid("a"), &tid("c"));

        assert_eq!(order(&board), vec!["b", "c", "a"]);
        assert!(writes.is_empty());
    }

    #[test]
    fn test_same_column_move_upwards() {
        let mut board = Board::new(
            vec![col("x", 0)],
            vec![task("a", "x"), task("b", "x"), task("c", "x")],
        );

        board.move_task_over_task(&tid("c"), &tid("a"));

        assert_eq!(order(&board), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_cross_column_move_lands_before_target() {
        let mut board = sample_board();

        let writes = board.move_task_over_task(&tid("a"), &tid("e"));

        assert_eq!(order(&board), vec!["b", "c", "d", "a", "e"]);
        assert_eq!(board.task(&tid("a")).unwrap().status, cid("y"));
        assert_eq!(writes.len(), 1);
        match &writes[0] {
            PendingWrite::Upsert(Record::Task(task)) => {
                assert_eq!(task.id, tid("a"));
                assert_eq!(task.status, cid("y"));
            }
            other => panic!("unexpected write {other:?}"),
        }

        let in_y: Vec<_> = board
            .tasks_in_column(&cid("y"))
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(in_y, vec!["d", "a", "e"]);
    }

    #[test]
    fn test_cross_column_move_backwards_lands_before_target() {
        let mut board = sample_board();

        board.move_task_over_task(&tid("e"), &tid("b"));

        assert_eq!(order(&board), vec!["a", "e", "b", "c", "d"]);
        let in_x: Vec<_> = board
            .tasks_in_column(&cid("x"))
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(in_x, vec!["a", "e", "b", "c"]);
    }

    #[test]
    fn test_cross_column_move_onto_first_task() {
        let mut board = sample_board();

        board.move_task_over_task(&tid("d"), &tid("a"));

        assert_eq!(order(&board), vec!["d", "a", "b", "c", "e"]);
        assert_eq!(board.task(&tid("d")).unwrap().status, cid("x"));
    }

    #[test]
    fn test_cross_column_move_preserves_other_orders() {
        let mut board = sample_board();

        board.move_task_over_task(&tid("b"), &tid("d"));

        let in_x: Vec<_> = board
            .tasks_in_column(&cid("x"))
            .map(|t| t.id.as_str())
            .collect();
        let in_y: Vec<_> = board
            .tasks_in_column(&cid("y"))
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(in_x, vec!["a", "c"]);
        assert_eq!(in_y, vec!["b", "d", "e"]);
    }

    #[test]
    fn test_move_task_over_column_appends() {
        let mut board = sample_board();

        let writes = board.move_task_over_column(&tid("a"), &cid("y"));

        assert_eq!(order(&board), vec!["b", "c", "d", "e", "a"]);
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].record_id(), "a");
    }

    #[test]
    fn test_move_task_over_column_appends_after_last_member() {
        let mut board = Board::new(
            vec![col("x", 0), col("y", 1)],
            vec![task("d", "y"), task("a", "x"), task("b", "x")],
        );

        board.move_task_over_column(&tid("b"), &cid("y"));

        assert_eq!(order(&board), vec!["d", "b", "a"]);
    }

    #[test]
    fn test_move_task_over_empty_column() {
        let mut board = Board::new(
            vec![col("x", 0), col("y", 1), col("z", 2)],
            vec![task("a", "x"), task("b", "x")],
        );

        board.move_task_over_column(&tid("a"), &cid("z"));

        assert_eq!(board.task(&tid("a")).unwrap().status, cid("z"));
        let in_z: Vec<_> = board
            .tasks_in_column(&cid("z"))
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(in_z, vec!["a"]);
    }

    #[test]
    fn test_move_task_over_own_column_is_noop() {
        let mut board = sample_board();
        let before = board.clone();

        let writes = board.move_task_over_column(&tid("a"), &cid("x"));

        assert!(writes.is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_move_column_renumbers_changed_columns() {
        let mut board = Board::new(
            vec![col("1", 0), col("2", 1), col("3", 2), col("4", 3)],
            Vec::new(),
        );

        let writes = board.move_column(&cid("4"), &cid("2"));

        assert_eq!(column_ids(&board), vec!["1", "4", "2", "3"]);
        let orders: Vec<u32> = board.columns().iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);

        let written: Vec<&str> = writes.iter().map(|w| w.record_id()).collect();
        assert_eq!(written, vec!["4", "2", "3"]);
    }

    #[test]
    fn test_move_column_fixes_sparse_orders() {
        let mut board = Board::new(vec![col("a", 0), col("b", 5), col("c", 9)], Vec::new());

        let writes = board.move_column(&cid("a"), &cid("b"));

        assert_eq!(column_ids(&board), vec!["b", "a", "c"]);
        assert_eq!(writes.len(), 3);
    }

    #[test]
    fn test_noop_guards() {
        let mut board = sample_board();
        let before = board.clone();

        assert!(board.move_task_over_task(&tid("a"), &tid("a")).is_empty());
        assert!(board.move_column(&cid("x"), &cid("x")).is_empty());
        assert!(board.move_task_over_task(&tid("ghost"), &tid("a")).is_empty());
        assert!(board.move_task_over_task(&tid("a"), &tid("ghost")).is_empty());
        assert!(board.move_task_over_column(&tid("ghost"), &cid("y")).is_empty());
        assert!(board.move_task_over_column(&tid("a"), &cid("ghost")).is_empty());
        assert!(board.move_column(&cid("ghost"), &cid("x")).is_empty());

        assert_eq!(board, before);
    }

    #[test]
    fn test_add_column() {
        let mut board = Board::with_default_columns(&owner());
        assert_eq!(column_ids(&board), vec!["backlog", "todo", "inprogress", "done"]);

        let write = board.add_column(owner());

        assert_eq!(board.columns().len(), 5);
        let added = &board.columns()[4];
        assert_eq!(added.title, "Column 5");
        assert_eq!(added.order, 4);
        assert_eq!(write.record_id(), added.id.as_str());
    }

    #[test]
    fn test_add_task_requires_existing_column() {
        let mut board = sample_board();

        assert!(board.add_task(task("f", "y")).is_ok());
        assert_eq!(order(&board).last(), Some(&"f"));

        let err = board.add_task(task("g", "nowhere")).unwrap_err();
        assert!(matches!(err, MonolithError::RecordNotFound { .. }));
    }

    #[test]
    fn test_update_task_and_column() {
        let mut board = sample_board();

        let mut edited = board.task(&tid("b")).unwrap().clone();
        edited.set_title("Renamed".to_string());
        board.update_task(edited).unwrap();
        assert_eq!(board.task(&tid("b")).unwrap().title, "Renamed");
        assert_eq!(order(&board), vec!["a", "b", "c", "d", "e"]);

        let mut lane = board.column(&cid("y")).unwrap().clone();
        lane.title = "Doing".to_string();
        lane.order = 7;
        board.update_column(lane).unwrap();
        let stored = board.column(&cid("y")).unwrap();
        assert_eq!(stored.title, "Doing");
        assert_eq!(stored.order, 1);

        assert!(board.update_task(task("ghost", "x")).is_err());
    }

    #[test]
    fn test_remove_task() {
        let mut board = sample_board();

        let write = board.remove_task(&tid("c")).unwrap();
        assert_eq!(write.collection(), Collection::Tasks);
        assert_eq!(order(&board), vec!["a", "b", "d", "e"]);
        assert!(board.remove_task(&tid("c")).is_none());
    }

    #[test]
    fn test_drag_session_ignores_repeated_hover() {
        let mut board = sample_board();
        let mut session = DragSession::start(DragItem::Task(tid("a")));

        let writes = session.hover(&mut board, &DragItem::Task(tid("e")));
        assert_eq!(writes.len(), 1);
        let after_first = board.clone();

        let writes = session.hover(&mut board, &DragItem::Task(tid("e")));
        assert!(writes.is_empty());
        assert_eq!(board, after_first);
    }

    #[test]
    fn test_drag_session_follows_pointer() {
        let mut board = sample_board();
        let mut session = DragSession::start(DragItem::Task(tid("a")));

        session.hover(&mut board, &DragItem::Task(tid("d")));
        assert_eq!(order(&board), vec!["b", "c", "a", "d", "e"]);

        // Now in column y: hovering e is a same-column array move
        let writes = session.hover(&mut board, &DragItem::Task(tid("e")));
        assert!(writes.is_empty());
        assert_eq!(order(&board), vec!["b", "c", "d", "e", "a"]);

        assert!(session.finish(&mut board, Some(&DragItem::Task(tid("e")))).is_empty());
    }

    #[test]
    fn test_drag_session_moves_columns_on_drop() {
        let mut board = sample_board();
        let mut session = DragSession::start(DragItem::Column(cid("y")));

        assert!(session
            .hover(&mut board, &DragItem::Column(cid("x")))
            .is_empty());
        assert_eq!(column_ids(&board), vec!["x", "y"]);

        let writes = session.finish(&mut board, Some(&DragItem::Column(cid("x"))));
        assert_eq!(column_ids(&board), vec!["y", "x"]);
        assert_eq!(writes.len(), 2);
    }

    #[test]
    fn test_drag_session_drop_outside_board() {
        let mut board = sample_board();
        let session = DragSession::start(DragItem::Column(cid("y")));

        assert!(session.finish(&mut board, None).is_empty());
        assert_eq!(column_ids(&board), vec!["x", "y"]);
    }
}
